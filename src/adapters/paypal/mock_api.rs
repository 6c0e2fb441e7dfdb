//! Mock PayPal API for testing.
//!
//! Provides a configurable in-memory implementation of `PaypalApi` for unit
//! and integration tests. Supports:
//! - An in-memory order store that create/capture/get operate on
//! - A pre-configured refund response
//! - Error injection per method
//! - Call and request tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::api_types::{
    Capture, CreateOrderRequest, Order, PaymentCollection, PaymentToken, PaymentTokenList,
    PurchaseUnit, Refund, RefundRequest, SetupToken, SetupTokenRequest, VaultCustomer,
};
use super::client::{PaypalApi, PaypalApiError};

/// Mock PayPal API for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaypalApi::new();
/// mock.add_order(order);
/// mock.set_method_error("capture_order", PaypalApiError::Api { status: 422, .. });
///
/// let adapter = PaypalPaymentAdapter::new(Arc::new(mock.clone()));
/// ```
#[derive(Default)]
pub struct MockPaypalApi {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Orders by id.
    orders: HashMap<String, Order>,

    /// Stored payment tokens by customer id.
    payment_tokens: HashMap<String, Vec<PaymentToken>>,

    /// Next refund returned by `refund_capture`.
    next_refund: Option<Refund>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaypalApiError>,

    /// Requests as received.
    create_order_requests: Vec<CreateOrderRequest>,
    refund_requests: Vec<(String, RefundRequest)>,
    setup_token_requests: Vec<SetupTokenRequest>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Sequence for generated ids.
    sequence: u32,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.sequence += 1;
        format!("{}-{}", prefix, self.sequence)
    }
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaypalApi {
    /// Create a new mock with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add an order to the store.
    pub fn add_order(&self, order: Order) {
        let id = order.id.clone();
        self.inner.lock().unwrap().orders.insert(id, order);
    }

    /// Set the refund to return on the next `refund_capture` call.
    pub fn set_refund(&self, refund: Refund) {
        self.inner.lock().unwrap().next_refund = Some(refund);
    }

    /// Add a stored payment token for a customer.
    pub fn add_payment_token(&self, customer_id: &str, token: PaymentToken) {
        self.inner
            .lock()
            .unwrap()
            .payment_tokens
            .entry(customer_id.to_string())
            .or_default()
            .push(token);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaypalApiError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        self.inner.lock().unwrap().method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Total number of calls to any method.
    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }

    /// Most recent `create_order` request.
    pub fn last_create_order_request(&self) -> Option<CreateOrderRequest> {
        self.inner.lock().unwrap().create_order_requests.last().cloned()
    }

    /// Most recent `refund_capture` request with its capture id.
    pub fn last_refund_request(&self) -> Option<(String, RefundRequest)> {
        self.inner.lock().unwrap().refund_requests.last().cloned()
    }

    /// Most recent `create_setup_token` request.
    pub fn last_setup_token_request(&self) -> Option<SetupTokenRequest> {
        self.inner.lock().unwrap().setup_token_requests.last().cloned()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaypalApiError> {
        match self.inner.lock().unwrap().method_errors.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn order_not_found(order_id: &str) -> PaypalApiError {
        PaypalApiError::Api {
            status: 404,
            code: Some("RESOURCE_NOT_FOUND".to_string()),
            message: format!("Order {} does not exist", order_id),
            debug_id: None,
        }
    }
}

impl Clone for MockPaypalApi {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaypalApi for MockPaypalApi {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
        request_id: Option<&str>,
    ) -> Result<Order, PaypalApiError> {
        self.record_call(
            "create_order",
            vec![request_id.unwrap_or_default().to_string()],
        );
        self.check_error("create_order")?;

        let mut state = self.inner.lock().unwrap();
        state.create_order_requests.push(request.clone());

        let order = Order {
            id: state.next_id("ORDER"),
            status: "CREATED".to_string(),
            intent: Some("CAPTURE".to_string()),
            purchase_units: request
                .purchase_units
                .iter()
                .map(|unit| PurchaseUnit {
                    reference_id: unit.reference_id.clone(),
                    amount: Some(unit.amount.clone()),
                    custom_id: unit.custom_id.clone(),
                    payments: None,
                })
                .collect(),
            links: Vec::new(),
        };

        state.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn capture_order(&self, order_id: &str) -> Result<Order, PaypalApiError> {
        self.record_call("capture_order", vec![order_id.to_string()]);
        self.check_error("capture_order")?;

        let mut state = self.inner.lock().unwrap();

        let capture_id = state.next_id("CAPTURE");
        let mut order = state
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| Self::order_not_found(order_id))?;
        order.status = "COMPLETED".to_string();
        if let Some(unit) = order.purchase_units.first_mut() {
            unit.payments = Some(PaymentCollection {
                captures: vec![Capture {
                    id: capture_id,
                    status: Some("COMPLETED".to_string()),
                    amount: unit.amount.clone(),
                }],
            });
        }

        state.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, PaypalApiError> {
        self.record_call("get_order", vec![order_id.to_string()]);
        self.check_error("get_order")?;

        let state = self.inner.lock().unwrap();
        state
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| Self::order_not_found(order_id))
    }

    async fn refund_capture(
        &self,
        capture_id: &str,
        request: &RefundRequest,
    ) -> Result<Refund, PaypalApiError> {
        self.record_call("refund_capture", vec![capture_id.to_string()]);
        self.check_error("refund_capture")?;

        let mut state = self.inner.lock().unwrap();
        state
            .refund_requests
            .push((capture_id.to_string(), request.clone()));

        let refund = match state.next_refund.take() {
            Some(refund) => refund,
            None => Refund {
                id: state.next_id("REFUND"),
                status: "COMPLETED".to_string(),
                amount: request.amount.clone(),
            },
        };

        Ok(refund)
    }

    async fn create_setup_token(
        &self,
        request: &SetupTokenRequest,
        request_id: Option<&str>,
    ) -> Result<SetupToken, PaypalApiError> {
        self.record_call(
            "create_setup_token",
            vec![request_id.unwrap_or_default().to_string()],
        );
        self.check_error("create_setup_token")?;

        let mut state = self.inner.lock().unwrap();
        state.setup_token_requests.push(request.clone());

        let token = SetupToken {
            id: state.next_id("SETUP"),
            status: "CREATED".to_string(),
            customer: request.customer.clone(),
            payment_source: Some(serde_json::json!({ "card": request.payment_source.card })),
        };

        Ok(token)
    }

    async fn list_payment_tokens(
        &self,
        customer_id: &str,
        page_size: u32,
    ) -> Result<PaymentTokenList, PaypalApiError> {
        self.record_call(
            "list_payment_tokens",
            vec![customer_id.to_string(), page_size.to_string()],
        );
        self.check_error("list_payment_tokens")?;

        let state = self.inner.lock().unwrap();
        let tokens: Vec<PaymentToken> = state
            .payment_tokens
            .get(customer_id)
            .map(|tokens| tokens.iter().take(page_size as usize).cloned().collect())
            .unwrap_or_default();

        Ok(PaymentTokenList {
            total_items: Some(tokens.len() as u32),
            total_pages: Some(1),
            payment_tokens: tokens,
        })
    }
}

impl PaymentToken {
    /// Card token for a customer, for tests.
    pub fn mock_card(id: &str, customer_id: &str, last_digits: &str) -> Self {
        Self {
            id: id.to_string(),
            customer: Some(VaultCustomer {
                id: customer_id.to_string(),
            }),
            payment_source: serde_json::json!({
                "card": { "brand": "VISA", "last_digits": last_digits }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::paypal::api_types::{Money, OrderIntent, PurchaseUnitRequest};

    fn order_request() -> CreateOrderRequest {
        CreateOrderRequest {
            intent: OrderIntent::Capture,
            purchase_units: vec![PurchaseUnitRequest {
                reference_id: None,
                amount: Money {
                    currency_code: "USD".to_string(),
                    value: "3.50".to_string(),
                },
                custom_id: Some("sess_1".to_string()),
            }],
            application_context: None,
        }
    }

    #[tokio::test]
    async fn create_then_capture_populates_capture() {
        let mock = MockPaypalApi::new();

        let created = mock.create_order(&order_request(), Some("idem-1")).await.unwrap();
        assert_eq!(created.status, "CREATED");

        let captured = mock.capture_order(&created.id).await.unwrap();
        assert_eq!(captured.status, "COMPLETED");
        let captures = &captured.purchase_units[0].payments.as_ref().unwrap().captures;
        assert_eq!(captures.len(), 1);

        let fetched = mock.get_order(&created.id).await.unwrap();
        assert_eq!(fetched, captured);
        assert_eq!(mock.calls()[0].args, vec!["idem-1".to_string()]);
    }

    #[tokio::test]
    async fn unknown_order_is_404() {
        let mock = MockPaypalApi::new();
        let err = mock.get_order("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn method_error_is_returned() {
        let mock = MockPaypalApi::new();
        mock.set_method_error("get_order", PaypalApiError::Transport("down".to_string()));

        let err = mock.get_order("any").await.unwrap_err();
        assert_eq!(err, PaypalApiError::Transport("down".to_string()));

        mock.clear_errors();
        assert!(mock.get_order("any").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_respects_page_size() {
        let mock = MockPaypalApi::new();
        for i in 0..3 {
            mock.add_payment_token("paypal_cus_1", PaymentToken::mock_card(&format!("tok_{i}"), "paypal_cus_1", "4242"));
        }

        let list = mock.list_payment_tokens("paypal_cus_1", 2).await.unwrap();
        assert_eq!(list.payment_tokens.len(), 2);
        assert!(mock.list_payment_tokens("other", 100).await.unwrap().payment_tokens.is_empty());
    }
}
