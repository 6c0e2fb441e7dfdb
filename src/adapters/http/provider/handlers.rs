//! HTTP handlers for provider endpoints.
//!
//! Each handler forwards the host input record to the matching
//! `PaymentProvider` operation and returns its output as JSON.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde_json::Value;

use crate::ports::{
    AccountHolderInput, InitiatePaymentInput, PaymentDataInput, PaymentError, PaymentErrorCode,
    PaymentMethodInput, PaymentProvider, RefundPaymentInput, WebhookPayload,
};

use super::dto::{ErrorResponse, PaymentMethodListResponse, ProviderInfoResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for provider routes.
#[derive(Clone)]
pub struct ProviderAppState {
    pub provider: Arc<dyn PaymentProvider>,
}

impl ProviderAppState {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }
}

/// GET / - Provider identifier
pub async fn provider_info(State(state): State<ProviderAppState>) -> impl IntoResponse {
    Json(ProviderInfoResponse {
        identifier: state.provider.identifier().to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /payments/initiate
pub async fn initiate_payment(
    State(state): State<ProviderAppState>,
    Json(input): Json<InitiatePaymentInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.initiate_payment(input).await?;
    Ok((StatusCode::CREATED, Json(output)))
}

/// POST /payments/authorize
pub async fn authorize_payment(
    State(state): State<ProviderAppState>,
    Json(input): Json<PaymentDataInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.authorize_payment(input).await?;
    Ok(Json(output))
}

/// POST /payments/capture
pub async fn capture_payment(
    State(state): State<ProviderAppState>,
    Json(input): Json<PaymentDataInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.capture_payment(input).await?;
    Ok(Json(output))
}

/// POST /payments/cancel
pub async fn cancel_payment(
    State(state): State<ProviderAppState>,
    Json(input): Json<PaymentDataInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.cancel_payment(input).await?;
    Ok(Json(output))
}

/// POST /payments/delete
pub async fn delete_payment(
    State(state): State<ProviderAppState>,
    Json(input): Json<PaymentDataInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.delete_payment(input).await?;
    Ok(Json(output))
}

/// POST /payments/refund
pub async fn refund_payment(
    State(state): State<ProviderAppState>,
    Json(input): Json<RefundPaymentInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.refund_payment(input).await?;
    Ok(Json(output))
}

/// POST /payments/retrieve
pub async fn retrieve_payment(
    State(state): State<ProviderAppState>,
    Json(input): Json<PaymentDataInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.retrieve_payment(input).await?;
    Ok(Json(output))
}

/// POST /payments/update
pub async fn update_payment(
    State(state): State<ProviderAppState>,
    Json(input): Json<InitiatePaymentInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.update_payment(input).await?;
    Ok(Json(output))
}

/// POST /payments/status
pub async fn get_payment_status(
    State(state): State<ProviderAppState>,
    Json(input): Json<PaymentDataInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.get_payment_status(input).await?;
    Ok(Json(output))
}

// ════════════════════════════════════════════════════════════════════════════════
// Account Holder Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /account-holders/create
pub async fn create_account_holder(
    State(state): State<ProviderAppState>,
    Json(input): Json<AccountHolderInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.create_account_holder(input).await?;
    Ok((StatusCode::CREATED, Json(output)))
}

/// POST /account-holders/update
pub async fn update_account_holder(
    State(state): State<ProviderAppState>,
    Json(input): Json<AccountHolderInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.update_account_holder(input).await?;
    Ok(Json(output))
}

/// POST /account-holders/delete
pub async fn delete_account_holder(
    State(state): State<ProviderAppState>,
    Json(input): Json<AccountHolderInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.delete_account_holder(input).await?;
    Ok(Json(output))
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment Method Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /payment-methods/save
pub async fn save_payment_method(
    State(state): State<ProviderAppState>,
    Json(input): Json<PaymentMethodInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let output = state.provider.save_payment_method(input).await?;
    Ok((StatusCode::CREATED, Json(output)))
}

/// POST /payment-methods/list
pub async fn list_payment_methods(
    State(state): State<ProviderAppState>,
    Json(input): Json<PaymentMethodInput>,
) -> Result<impl IntoResponse, ProviderApiError> {
    let payment_methods = state.provider.list_payment_methods(input).await?;
    Ok(Json(PaymentMethodListResponse { payment_methods }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Handler
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/paypal - Resolve a PayPal webhook event
///
/// The body is the raw event envelope. Headers are passed through so the host
/// can verify transmission signatures on its side.
pub async fn handle_paypal_webhook(
    State(state): State<ProviderAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ProviderApiError> {
    let data: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse webhook payload");
        PaymentError::invalid_data(format!("Invalid webhook payload: {}", e))
    })?;

    let headers: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let result = state
        .provider
        .get_webhook_action_and_data(WebhookPayload { data, headers })
        .await?;

    Ok(Json(result))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts provider errors to HTTP responses.
#[derive(Debug)]
pub struct ProviderApiError(PaymentError);

impl From<PaymentError> for ProviderApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ProviderApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match self.0.code {
            PaymentErrorCode::InvalidData => (StatusCode::BAD_REQUEST, "INVALID_DATA"),
            PaymentErrorCode::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        };

        let body = ErrorResponse::new(error_code, self.0.message)
            .with_provider_code(self.0.provider_code);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_data_maps_to_bad_request() {
        let response =
            ProviderApiError::from(PaymentError::invalid_data("Missing order id")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_unauthorized() {
        let response = ProviderApiError::from(
            PaymentError::unauthorized("Declined").with_provider_code("INSTRUMENT_DECLINED"),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
