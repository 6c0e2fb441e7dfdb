//! Axum router configuration for provider endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    authorize_payment, cancel_payment, capture_payment, create_account_holder,
    delete_account_holder, delete_payment, get_payment_status, handle_paypal_webhook,
    initiate_payment, list_payment_methods, provider_info, refund_payment, retrieve_payment,
    save_payment_method, update_account_holder, update_payment, ProviderAppState,
};

/// Payment session lifecycle routes.
///
/// # Routes
/// - `POST /initiate`, `/authorize`, `/capture`, `/cancel`, `/delete`
/// - `POST /refund`, `/retrieve`, `/update`, `/status`
pub fn payment_routes() -> Router<ProviderAppState> {
    Router::new()
        .route("/initiate", post(initiate_payment))
        .route("/authorize", post(authorize_payment))
        .route("/capture", post(capture_payment))
        .route("/cancel", post(cancel_payment))
        .route("/delete", post(delete_payment))
        .route("/refund", post(refund_payment))
        .route("/retrieve", post(retrieve_payment))
        .route("/update", post(update_payment))
        .route("/status", post(get_payment_status))
}

/// Account holder routes.
pub fn account_holder_routes() -> Router<ProviderAppState> {
    Router::new()
        .route("/create", post(create_account_holder))
        .route("/update", post(update_account_holder))
        .route("/delete", post(delete_account_holder))
}

/// Saved payment method routes.
pub fn payment_method_routes() -> Router<ProviderAppState> {
    Router::new()
        .route("/save", post(save_payment_method))
        .route("/list", post(list_payment_methods))
}

/// Webhook routes.
///
/// # Routes
/// - `POST /paypal` - Resolve a PayPal webhook event
pub fn webhook_routes() -> Router<ProviderAppState> {
    Router::new().route("/paypal", post(handle_paypal_webhook))
}

/// Create the complete provider router.
///
/// # Example
///
/// ```ignore
/// let state = ProviderAppState::new(Arc::new(adapter));
/// let app = provider_router().with_state(state);
/// ```
pub fn provider_router() -> Router<ProviderAppState> {
    Router::new()
        .route("/", get(provider_info))
        .nest("/payments", payment_routes())
        .nest("/account-holders", account_holder_routes())
        .nest("/payment-methods", payment_method_routes())
        .nest("/webhooks", webhook_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::paypal::{MockPaypalApi, PaypalApiError, PaypalPaymentAdapter};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(mock: &MockPaypalApi) -> Router {
        let adapter = PaypalPaymentAdapter::new(Arc::new(mock.clone()));
        provider_router().with_state(ProviderAppState::new(Arc::new(adapter)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_identifier() {
        let response = app(&MockPaypalApi::new())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["identifier"], "paypal");
    }

    #[tokio::test]
    async fn initiate_returns_created_order() {
        let mock = MockPaypalApi::new();

        let response = app(&mock)
            .oneshot(post_json(
                "/payments/initiate",
                json!({ "amount": 350, "currency_code": "usd", "data": { "session_id": "sess_1" } }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "pending");
        assert_eq!(body["data"]["purchase_units"][0]["amount"]["value"], "3.50");
        assert!(mock.was_called("create_order"));
    }

    #[tokio::test]
    async fn status_without_order_id_is_pending() {
        let response = app(&MockPaypalApi::new())
            .oneshot(post_json("/payments/status", json!({ "data": {} })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "pending");
    }

    #[tokio::test]
    async fn invalid_data_maps_to_400() {
        let response = app(&MockPaypalApi::new())
            .oneshot(post_json("/payments/refund", json!({ "amount": 100, "data": {} })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "INVALID_DATA");
    }

    #[tokio::test]
    async fn processor_rejection_maps_to_401() {
        let mock = MockPaypalApi::new();
        mock.set_method_error(
            "capture_order",
            PaypalApiError::Api {
                status: 400,
                code: Some("INSTRUMENT_DECLINED".to_string()),
                message: "declined".to_string(),
                debug_id: None,
            },
        );

        let response = app(&mock)
            .oneshot(post_json("/payments/authorize", json!({ "data": { "id": "ORDER-1" } })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "UNAUTHORIZED");
        assert_eq!(body["provider_code"], "INSTRUMENT_DECLINED");
    }

    #[tokio::test]
    async fn account_holder_create_uses_customer() {
        let response = app(&MockPaypalApi::new())
            .oneshot(post_json(
                "/account-holders/create",
                json!({ "context": { "customer": { "id": "cus_1", "email": "a@b.c" } } }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["id"], "paypal_cus_1");
    }

    #[tokio::test]
    async fn payment_method_list_wraps_results() {
        let response = app(&MockPaypalApi::new())
            .oneshot(post_json(
                "/payment-methods/list",
                json!({ "context": { "account_holder": { "data": { "id": "paypal_cus_1" } } } }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["payment_methods"], json!([]));
    }

    #[tokio::test]
    async fn webhook_resolves_event() {
        let response = app(&MockPaypalApi::new())
            .oneshot(post_json(
                "/webhooks/paypal",
                json!({
                    "event_type": "CHECKOUT.ORDER.APPROVED",
                    "resource": {
                        "purchase_units": [{ "custom_id": "sess_9", "amount": { "value": "1.00" } }]
                    }
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["action"], "authorized");
        assert_eq!(body["data"]["session_id"], "sess_9");
        assert_eq!(body["data"]["amount"], 100);
    }

    #[tokio::test]
    async fn webhook_rejects_malformed_body() {
        let response = app(&MockPaypalApi::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhooks/paypal")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app(&MockPaypalApi::new())
            .oneshot(post_json("/payments/unknown", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
