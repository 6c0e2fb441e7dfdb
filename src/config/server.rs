//! HTTP listener and logging settings for the provider service

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::ops::RangeInclusive;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::error::ValidationError;

/// Seconds a single provider request may take, PayPal round trips included.
pub const REQUEST_TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;

/// Listener settings read from `PAYPAL_PROVIDER__SERVER__*`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// IP address to bind
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    /// `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Deployment environment. Production switches logs to JSON and
/// requires HTTPS for any PayPal base URL override.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.trim().parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn log_format(&self) -> LogFormat {
        match self.environment {
            Environment::Production => LogFormat::Json,
            Environment::Development => LogFormat::Pretty,
        }
    }

    /// Check everything `main` needs before binding.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.socket_addr().is_err() {
            return Err(ValidationError::InvalidHost(self.host.clone()));
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !REQUEST_TIMEOUT_RANGE.contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        if EnvFilter::try_new(&self.log_level).is_err() {
            return Err(ValidationError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,paypal_payment_provider=debug".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_timeout(secs: u64) -> ServerConfig {
        ServerConfig {
            request_timeout_secs: secs,
            ..Default::default()
        }
    }

    #[test]
    fn defaults_pass_validation() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_format(), LogFormat::Pretty);
    }

    #[test]
    fn timeout_bounds_are_inclusive() {
        assert!(with_timeout(1).validate().is_ok());
        assert!(with_timeout(300).validate().is_ok());
        assert_eq!(with_timeout(0).validate(), Err(ValidationError::InvalidTimeout));
        assert_eq!(with_timeout(301).validate(), Err(ValidationError::InvalidTimeout));
    }

    #[test]
    fn port_zero_is_rejected() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn host_must_be_an_ip_address() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidHost("localhost".to_string()))
        );

        let ipv6 = ServerConfig {
            host: "::1".to_string(),
            port: 9090,
            ..Default::default()
        };
        assert_eq!(ipv6.socket_addr().unwrap().to_string(), "[::1]:9090");
    }

    #[test]
    fn malformed_log_level_is_rejected() {
        let config = ServerConfig {
            log_level: "info,paypal_payment_provider=loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn production_logs_as_json() {
        let config = ServerConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        assert!(config.is_production());
        assert_eq!(config.log_format(), LogFormat::Json);
    }
}
