//! Payment provider port.
//!
//! Defines the contract the host platform drives a payment provider through:
//! payment lifecycle, account holders, saved payment methods and webhook
//! resolution. Host records are exchanged as opaque JSON objects
//! ([`PaymentData`]); the provider decides which fields it reads and writes.
//!
//! # Design
//!
//! - **One call per operation**: each method maps to at most one processor
//!   call (two for the authorize fallback)
//! - **Two error kinds**: invalid data and processor rejection
//! - **Stateless**: the host and the processor own all durable state

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{HostCustomer, PaymentSessionStatus, WebhookActionResult};

/// Opaque host payment record.
pub type PaymentData = Map<String, Value>;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Provider identifier registered with the host.
    fn identifier(&self) -> &'static str;

    /// Create a processor-side payment for a new payment session.
    async fn initiate_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> Result<InitiatePaymentOutput, PaymentError>;

    /// Authorize the payment session.
    async fn authorize_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentStatusOutput, PaymentError>;

    /// Capture an authorized payment.
    async fn capture_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentDataOutput, PaymentError>;

    /// Cancel a payment.
    async fn cancel_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentDataOutput, PaymentError>;

    /// Delete a payment session.
    async fn delete_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentDataOutput, PaymentError>;

    /// Refund a captured payment, fully or partially.
    async fn refund_payment(
        &self,
        input: RefundPaymentInput,
    ) -> Result<PaymentDataOutput, PaymentError>;

    /// Retrieve the current processor-side payment data.
    async fn retrieve_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentDataOutput, PaymentError>;

    /// Update a payment session's amount or currency.
    async fn update_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> Result<InitiatePaymentOutput, PaymentError>;

    /// Current session status.
    ///
    /// The host polls this, so processor failures come back as
    /// [`PaymentSessionStatus::Error`] rather than `Err`.
    async fn get_payment_status(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentStatusOutput, PaymentError>;

    async fn create_account_holder(
        &self,
        input: AccountHolderInput,
    ) -> Result<AccountHolderOutput, PaymentError>;

    async fn update_account_holder(
        &self,
        input: AccountHolderInput,
    ) -> Result<AccountHolderOutput, PaymentError>;

    async fn delete_account_holder(
        &self,
        input: AccountHolderInput,
    ) -> Result<AccountHolderOutput, PaymentError>;

    /// Store a payment method for later reuse.
    async fn save_payment_method(
        &self,
        input: PaymentMethodInput,
    ) -> Result<PaymentMethodOutput, PaymentError>;

    /// List stored payment methods for an account holder.
    async fn list_payment_methods(
        &self,
        input: PaymentMethodInput,
    ) -> Result<Vec<PaymentMethodOutput>, PaymentError>;

    /// Map a webhook event onto a host action.
    async fn get_webhook_action_and_data(
        &self,
        payload: WebhookPayload,
    ) -> Result<WebhookActionResult, PaymentError>;
}

/// Account holder reference passed in the host context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountHolderRef {
    #[serde(default)]
    pub data: PaymentData,
}

/// Host context accompanying most calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentContext {
    /// Host idempotency key, forwarded as PayPal's request id.
    #[serde(default)]
    pub idempotency_key: Option<String>,

    #[serde(default)]
    pub customer: Option<HostCustomer>,

    #[serde(default)]
    pub account_holder: Option<AccountHolderRef>,
}

impl PaymentContext {
    /// Id of the account holder in context, if any.
    pub fn account_holder_id(&self) -> Option<String> {
        self.account_holder.as_ref().and_then(|holder| {
            crate::domain::field_lookup::first_string(
                &holder.data,
                &crate::domain::field_lookup::ACCOUNT_HOLDER_ID_PATHS,
            )
        })
    }
}

/// Input for `initiate_payment` and `update_payment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitiatePaymentInput {
    /// Amount in minor units.
    #[serde(default)]
    pub amount: Option<i64>,

    #[serde(default)]
    pub currency_code: Option<String>,

    #[serde(default)]
    pub data: PaymentData,

    #[serde(default)]
    pub context: PaymentContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatePaymentOutput {
    /// Processor payment id (PayPal order id).
    pub id: String,
    pub status: PaymentSessionStatus,
    pub data: PaymentData,
}

/// Input carrying only session data and context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentDataInput {
    #[serde(default)]
    pub data: PaymentData,

    #[serde(default)]
    pub context: PaymentContext,
}

impl PaymentDataInput {
    pub fn new(data: PaymentData) -> Self {
        Self {
            data,
            context: PaymentContext::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDataOutput {
    pub data: PaymentData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatusOutput {
    pub status: PaymentSessionStatus,
    pub data: PaymentData,
}

/// Input for `refund_payment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefundPaymentInput {
    /// Amount to refund in minor units; `None` refunds the full capture.
    #[serde(default)]
    pub amount: Option<i64>,

    #[serde(default)]
    pub data: PaymentData,

    #[serde(default)]
    pub context: PaymentContext,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountHolderInput {
    #[serde(default)]
    pub data: PaymentData,

    #[serde(default)]
    pub context: PaymentContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountHolderOutput {
    pub id: String,
    pub data: PaymentData,
}

/// Input for saving or listing payment methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodInput {
    #[serde(default)]
    pub data: PaymentData,

    #[serde(default)]
    pub context: PaymentContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodOutput {
    pub id: String,
    pub data: PaymentData,
}

/// Raw webhook delivered to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Parsed event envelope.
    #[serde(default)]
    pub data: Value,

    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Missing or malformed input, options or identifiers.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidData, message)
    }

    /// The processor rejected or failed the call.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Unauthorized, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Missing configuration, order id, capture id or account holder id.
    InvalidData,

    /// Processor call failed or was rejected.
    Unauthorized,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::InvalidData => "invalid_data",
            PaymentErrorCode::Unauthorized => "unauthorized",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Trait object safety test
    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::invalid_data("Missing capture id");
        assert_eq!(err.to_string(), "invalid_data: Missing capture id");
    }

    #[test]
    fn payment_error_with_provider_code() {
        let err = PaymentError::unauthorized("Declined").with_provider_code("INSTRUMENT_DECLINED");
        assert_eq!(err.code, PaymentErrorCode::Unauthorized);
        assert_eq!(err.provider_code.as_deref(), Some("INSTRUMENT_DECLINED"));
    }

    #[test]
    fn inputs_deserialize_from_sparse_host_json() {
        let input: InitiatePaymentInput = serde_json::from_value(json!({
            "amount": 350,
            "currency_code": "usd"
        }))
        .unwrap();
        assert_eq!(input.amount, Some(350));
        assert!(input.data.is_empty());
        assert!(input.context.customer.is_none());

        let refund: RefundPaymentInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(refund.amount, None);
    }

    #[test]
    fn context_exposes_account_holder_id() {
        let context: PaymentContext = serde_json::from_value(json!({
            "account_holder": { "data": { "id": "paypal_cus_1" } }
        }))
        .unwrap();
        assert_eq!(context.account_holder_id().as_deref(), Some("paypal_cus_1"));
        assert_eq!(PaymentContext::default().account_holder_id(), None);
    }
}
