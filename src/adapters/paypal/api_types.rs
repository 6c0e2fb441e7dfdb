//! PayPal REST API request and response types.
//!
//! These types represent PayPal Orders v2, Payments v2 and Vault v3 objects.
//! They are designed to:
//! - Serialize requests exactly as PayPal expects (snake_case)
//! - Parse responses whether they arrive snake_case (wire) or camelCase
//!   (SDK-shaped data the host persisted)
//! - Skip absent fields so stored payment data stays compact

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ════════════════════════════════════════════════════════════════════════════════
// Authentication
// ════════════════════════════════════════════════════════════════════════════════

/// OAuth2 client-credentials token response.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub token_type: Option<String>,

    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// PayPal error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaypalErrorBody {
    /// Error name (e.g. `UNPROCESSABLE_ENTITY`, `RESOURCE_NOT_FOUND`).
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub debug_id: Option<String>,

    #[serde(default)]
    pub details: Vec<PaypalErrorDetail>,

    /// OAuth endpoint errors use `error` / `error_description`.
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaypalErrorDetail {
    #[serde(default)]
    pub issue: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl PaypalErrorBody {
    /// Most specific error code available: first detail issue, then name.
    pub fn code(&self) -> Option<String> {
        self.details
            .iter()
            .find_map(|d| d.issue.clone())
            .or_else(|| self.name.clone())
            .or_else(|| self.error.clone())
    }

    /// Most specific human-readable message available.
    pub fn describe(&self) -> Option<String> {
        self.details
            .iter()
            .find_map(|d| d.description.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.error_description.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Orders
// ════════════════════════════════════════════════════════════════════════════════

/// Amount with currency, value as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    #[serde(alias = "currencyCode")]
    pub currency_code: String,

    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderIntent {
    Capture,
    Authorize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseUnitRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,

    pub amount: Money,

    /// Host session id, echoed back in webhooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

/// `POST /v2/checkout/orders` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    pub intent: OrderIntent,

    pub purchase_units: Vec<PurchaseUnitRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_context: Option<ApplicationContext>,
}

/// HATEOAS link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescription {
    pub href: String,
    pub rel: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Capture nested under an order's purchase unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCollection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<Capture>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    #[serde(
        default,
        alias = "referenceId",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,

    #[serde(default, alias = "customId", skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payments: Option<PaymentCollection>,
}

/// PayPal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,

    /// Raw status; mapped through `OrderStatus::parse`.
    #[serde(default)]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(default, alias = "purchaseUnits", skip_serializing_if = "Vec::is_empty")]
    pub purchase_units: Vec<PurchaseUnit>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// `POST /v2/payments/captures/{id}/refund` body. Empty refunds the full capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefundRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,

    #[serde(default)]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Vault
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultCustomer {
    pub id: String,
}

/// `POST /v3/vault/setup-tokens` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupTokenRequest {
    pub payment_source: SetupTokenPaymentSource,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<VaultCustomer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupTokenPaymentSource {
    /// Opaque card payload supplied by the host.
    pub card: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupToken {
    pub id: String,

    #[serde(default)]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<VaultCustomer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_source: Option<Value>,
}

/// Stored payment token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentToken {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<VaultCustomer>,

    #[serde(default)]
    pub payment_source: Value,
}

/// `GET /v3/vault/payment-tokens` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentTokenList {
    #[serde(default)]
    pub payment_tokens: Vec<PaymentToken>,

    #[serde(default)]
    pub total_items: Option<u32>,

    #[serde(default)]
    pub total_pages: Option<u32>,
}
