//! PayPal REST client.
//!
//! `PaypalApi` is the seam between the adapter and PayPal: one method per
//! processor endpoint the adapter uses. `PaypalHttpClient` implements it over
//! reqwest with OAuth2 client-credentials authentication.
//!
//! # Configuration
//!
//! ```ignore
//! let config = PaypalClientConfig::new(client_id, client_secret, true);
//! let client = PaypalHttpClient::new(config);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::ports::PaymentError;

use super::api_types::{
    AccessTokenResponse, CreateOrderRequest, Order, PaymentTokenList, PaypalErrorBody, Refund,
    RefundRequest, SetupToken, SetupTokenRequest,
};

/// Sandbox REST endpoint.
pub const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

/// Live REST endpoint.
pub const LIVE_BASE_URL: &str = "https://api-m.paypal.com";

/// Header carrying the idempotency key.
pub const PAYPAL_REQUEST_ID: &str = "PayPal-Request-Id";

/// Refresh the access token this long before PayPal expires it.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Errors from PayPal API calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaypalApiError {
    #[error("PayPal request failed: {0}")]
    Transport(String),

    #[error("PayPal authentication failed: {0}")]
    Authentication(String),

    #[error("PayPal API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        debug_id: Option<String>,
    },

    #[error("Failed to parse PayPal response: {0}")]
    Decode(String),
}

impl PaypalApiError {
    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            PaypalApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// PayPal error code for API errors.
    pub fn code(&self) -> Option<&str> {
        match self {
            PaypalApiError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// 409/422: the order is already captured or otherwise not capturable.
    pub fn is_conflict(&self) -> bool {
        matches!(self.status(), Some(409) | Some(422))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Convert into a host error of the given kind, keeping PayPal's code.
    pub fn into_payment_error(
        self,
        make: fn(String) -> PaymentError,
        context: &str,
    ) -> PaymentError {
        let code = self.code().map(str::to_string);
        let err = make(format!("{}: {}", context, self));
        match code {
            Some(code) => err.with_provider_code(code),
            None => err,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Configuration
// ════════════════════════════════════════════════════════════════════════════════

/// Provider options as the host passes them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaypalOptions {
    /// PayPal REST client id.
    #[serde(default)]
    pub api_key: Option<String>,

    /// PayPal REST client secret.
    #[serde(default)]
    pub api_secret: Option<String>,

    #[serde(default)]
    pub sandbox: Option<bool>,
}

/// PayPal client configuration.
#[derive(Clone)]
pub struct PaypalClientConfig {
    /// REST client id.
    client_id: String,

    /// REST client secret.
    client_secret: SecretString,

    /// Sandbox or live environment.
    sandbox: bool,

    /// Base URL for the REST API.
    api_base_url: String,
}

impl std::fmt::Debug for PaypalClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaypalClientConfig")
            .field("client_id", &self.client_id)
            .field("sandbox", &self.sandbox)
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

impl PaypalClientConfig {
    /// Create a new PayPal configuration.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>, sandbox: bool) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            sandbox,
            api_base_url: if sandbox { SANDBOX_BASE_URL } else { LIVE_BASE_URL }.to_string(),
        }
    }

    /// Validate host options. Both credentials are required.
    pub fn from_options(options: &PaypalOptions) -> Result<Self, PaymentError> {
        let required = |value: &Option<String>, name: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| PaymentError::invalid_data(format!("Required option `{}` is missing", name)))
        };

        let client_id = required(&options.api_key, "api_key")?;
        let client_secret = required(&options.api_secret, "api_secret")?;

        Ok(Self::new(client_id, client_secret, options.sandbox.unwrap_or(false)))
    }

    /// Read options from `PAYPAL_CLIENT_ID`, `PAYPAL_CLIENT_SECRET` and
    /// `PAYPAL_SANDBOX`, then validate them like host options.
    pub fn from_env() -> Result<Self, PaymentError> {
        let sandbox = match std::env::var("PAYPAL_SANDBOX") {
            Ok(value) => Some(parse_flag(&value).ok_or_else(|| {
                PaymentError::invalid_data(format!("PAYPAL_SANDBOX must be a boolean, got `{}`", value))
            })?),
            Err(_) => None,
        };

        let options = PaypalOptions {
            api_key: std::env::var("PAYPAL_CLIENT_ID").ok(),
            api_secret: std::env::var("PAYPAL_CLIENT_SECRET").ok(),
            sandbox,
        };

        Self::from_options(&options)
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// API Seam
// ════════════════════════════════════════════════════════════════════════════════

/// PayPal endpoints used by the payment adapter.
#[async_trait]
pub trait PaypalApi: Send + Sync {
    /// `POST /v2/checkout/orders`
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
        request_id: Option<&str>,
    ) -> Result<Order, PaypalApiError>;

    /// `POST /v2/checkout/orders/{id}/capture`
    async fn capture_order(&self, order_id: &str) -> Result<Order, PaypalApiError>;

    /// `GET /v2/checkout/orders/{id}`
    async fn get_order(&self, order_id: &str) -> Result<Order, PaypalApiError>;

    /// `POST /v2/payments/captures/{id}/refund`
    async fn refund_capture(
        &self,
        capture_id: &str,
        request: &RefundRequest,
    ) -> Result<Refund, PaypalApiError>;

    /// `POST /v3/vault/setup-tokens`
    async fn create_setup_token(
        &self,
        request: &SetupTokenRequest,
        request_id: Option<&str>,
    ) -> Result<SetupToken, PaypalApiError>;

    /// `GET /v3/vault/payment-tokens`
    async fn list_payment_tokens(
        &self,
        customer_id: &str,
        page_size: u32,
    ) -> Result<PaymentTokenList, PaypalApiError>;
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP Client
// ════════════════════════════════════════════════════════════════════════════════

struct CachedToken {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

/// reqwest-backed PayPal client.
pub struct PaypalHttpClient {
    config: PaypalClientConfig,
    http_client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl PaypalHttpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PaypalClientConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Bearer token, reused until shortly before it expires.
    async fn access_token(&self) -> Result<String, PaypalApiError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.expose_secret().clone());
            }
        }

        let response = self
            .http_client
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(self.config.client_secret.expose_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PaypalApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            let body: PaypalErrorBody = serde_json::from_str(&error_text).unwrap_or_default();
            tracing::error!(status, error = ?body.code(), "PayPal token request failed");
            return Err(PaypalApiError::Authentication(
                body.describe().unwrap_or(error_text),
            ));
        }

        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| PaypalApiError::Decode(e.to_string()))?;

        let lifetime = (token.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0);
        let value = token.access_token;
        *cached = Some(CachedToken {
            value: SecretString::new(value.clone()),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        });

        tracing::debug!(expires_in = token.expires_in, "PayPal access token refreshed");
        Ok(value)
    }

    /// Attach auth, send, and decode the response or PayPal's error body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T, PaypalApiError> {
        let token = self.access_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PaypalApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Revoked before its local expiry; fetch a fresh one next call
            *self.token.lock().await = None;
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let body: PaypalErrorBody = serde_json::from_str(&error_text).unwrap_or_default();
            tracing::error!(
                operation,
                status = status.as_u16(),
                error = ?body.code(),
                debug_id = ?body.debug_id,
                "PayPal API call failed"
            );
            return Err(PaypalApiError::Api {
                status: status.as_u16(),
                code: body.code(),
                message: body.describe().unwrap_or(error_text),
                debug_id: body.debug_id,
            });
        }

        response
            .json()
            .await
            .map_err(|e| PaypalApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PaypalApi for PaypalHttpClient {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
        request_id: Option<&str>,
    ) -> Result<Order, PaypalApiError> {
        let mut builder = self
            .http_client
            .post(self.url("/v2/checkout/orders"))
            .header("Prefer", "return=representation")
            .json(request);

        if let Some(request_id) = request_id {
            builder = builder.header(PAYPAL_REQUEST_ID, request_id);
        }

        self.send(builder, "create_order").await
    }

    async fn capture_order(&self, order_id: &str) -> Result<Order, PaypalApiError> {
        let builder = self
            .http_client
            .post(self.url(&format!("/v2/checkout/orders/{}/capture", order_id)))
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({}));

        self.send(builder, "capture_order").await
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, PaypalApiError> {
        let builder = self
            .http_client
            .get(self.url(&format!("/v2/checkout/orders/{}", order_id)));

        self.send(builder, "get_order").await
    }

    async fn refund_capture(
        &self,
        capture_id: &str,
        request: &RefundRequest,
    ) -> Result<Refund, PaypalApiError> {
        let builder = self
            .http_client
            .post(self.url(&format!("/v2/payments/captures/{}/refund", capture_id)))
            .header("Prefer", "return=representation")
            .json(request);

        self.send(builder, "refund_capture").await
    }

    async fn create_setup_token(
        &self,
        request: &SetupTokenRequest,
        request_id: Option<&str>,
    ) -> Result<SetupToken, PaypalApiError> {
        let mut builder = self
            .http_client
            .post(self.url("/v3/vault/setup-tokens"))
            .json(request);

        if let Some(request_id) = request_id {
            builder = builder.header(PAYPAL_REQUEST_ID, request_id);
        }

        self.send(builder, "create_setup_token").await
    }

    async fn list_payment_tokens(
        &self,
        customer_id: &str,
        page_size: u32,
    ) -> Result<PaymentTokenList, PaypalApiError> {
        let page_size = page_size.to_string();
        let builder = self
            .http_client
            .get(self.url("/v3/vault/payment-tokens"))
            .query(&[("customer_id", customer_id), ("page_size", page_size.as_str())]);

        self.send(builder, "list_payment_tokens").await
    }
}
