//! PayPal configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::adapters::paypal::PaypalClientConfig;

use super::error::ValidationError;

/// PayPal REST credentials and environment
#[derive(Debug, Clone, Deserialize)]
pub struct PaypalConfig {
    /// REST client id
    #[serde(default)]
    pub client_id: String,

    /// REST client secret
    #[serde(default = "empty_secret")]
    pub client_secret: SecretString,

    /// Use the sandbox environment
    #[serde(default)]
    pub sandbox: bool,

    /// Override for the REST base URL
    #[serde(default)]
    pub api_base_url: Option<String>,
}

impl PaypalConfig {
    /// Client configuration, honoring the base URL override
    pub fn to_client_config(&self) -> PaypalClientConfig {
        let config = PaypalClientConfig::new(
            self.client_id.clone(),
            self.client_secret.expose_secret().clone(),
            self.sandbox,
        );
        match &self.api_base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }

    /// Validate PayPal configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.client_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYPAL_CLIENT_ID"));
        }
        if self.client_secret.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYPAL_CLIENT_SECRET"));
        }

        if let Some(url) = &self.api_base_url {
            let is_https = url.starts_with("https://");
            if !is_https && !url.starts_with("http://") {
                return Err(ValidationError::InvalidApiBaseUrl);
            }
            if production && !is_https {
                return Err(ValidationError::ApiBaseUrlMustBeHttps);
            }
        }

        Ok(())
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}
