//! Response DTOs for provider endpoints.
//!
//! Request bodies are the host input records from `crate::ports` and are
//! deserialized as-is. Only envelopes that have no port counterpart live here.

use serde::{Deserialize, Serialize};

use crate::ports::PaymentMethodOutput;

/// Stored payment methods for an account holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodListResponse {
    pub payment_methods: Vec<PaymentMethodOutput>,
}

/// Provider identity, served at the router root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfoResponse {
    pub identifier: String,
}

/// Standard error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// PayPal's error name, when the processor supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_code: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, provider_code: Option<String>) -> Self {
        self.provider_code = provider_code;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_new_has_no_provider_code() {
        let response = ErrorResponse::new("INVALID_DATA", "Missing capture id");
        assert_eq!(response.error_code, "INVALID_DATA");
        assert_eq!(response.message, "Missing capture id");
        assert!(response.provider_code.is_none());
    }

    #[test]
    fn error_response_omits_absent_provider_code() {
        let json = serde_json::to_value(ErrorResponse::new("UNAUTHORIZED", "Declined")).unwrap();
        assert!(json.get("provider_code").is_none());

        let json = serde_json::to_value(
            ErrorResponse::new("UNAUTHORIZED", "Declined")
                .with_provider_code(Some("INSTRUMENT_DECLINED".to_string())),
        )
        .unwrap();
        assert_eq!(json["provider_code"], "INSTRUMENT_DECLINED");
    }
}
