//! Webhook event resolution.
//!
//! Maps a PayPal webhook envelope onto the host's action tag plus the
//! session id and amount the host needs to reconcile the payment. This is a
//! pure function: no signature verification, no network.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field_lookup::{
    first_defined, first_string, AMOUNT_VALUE_PATHS, CUSTOM_ID_PATHS, FIRST_PURCHASE_UNIT_PATHS,
};
use super::money::parse_decimal_amount;

/// Action the host should take for a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookAction {
    /// Funds were captured.
    #[serde(rename = "captured")]
    Successful,
    /// Capture was denied or declined.
    Failed,
    /// Payer approved the order or an authorization was created.
    Authorized,
    /// Event is not relevant to payment sessions.
    NotSupported,
}

/// Where the session id and amount live in an event resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceShape {
    /// Capture and authorization resources carry them at the top level.
    TopLevel,
    /// Order resources carry them on the first purchase unit.
    FirstPurchaseUnit,
}

/// PayPal event types the provider understands.
pub const SUPPORTED_EVENTS: [(&str, WebhookAction, ResourceShape); 6] = [
    (
        "PAYMENT.CAPTURE.COMPLETED",
        WebhookAction::Successful,
        ResourceShape::TopLevel,
    ),
    (
        "PAYMENT.CAPTURE.DENIED",
        WebhookAction::Failed,
        ResourceShape::TopLevel,
    ),
    (
        "PAYMENT.CAPTURE.DECLINED",
        WebhookAction::Failed,
        ResourceShape::TopLevel,
    ),
    (
        "PAYMENT.AUTHORIZATION.CREATED",
        WebhookAction::Authorized,
        ResourceShape::TopLevel,
    ),
    (
        "CHECKOUT.ORDER.APPROVED",
        WebhookAction::Authorized,
        ResourceShape::FirstPurchaseUnit,
    ),
    (
        "CHECKOUT.ORDER.COMPLETED",
        WebhookAction::Successful,
        ResourceShape::FirstPurchaseUnit,
    ),
];

/// Look up the action and resource shape for an event type.
pub fn classify_event(event_type: &str) -> Option<(WebhookAction, ResourceShape)> {
    SUPPORTED_EVENTS
        .iter()
        .find(|(name, _, _)| *name == event_type)
        .map(|(_, action, shape)| (*action, *shape))
}

/// Session data extracted from a webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSessionData {
    /// Host payment session id (PayPal `custom_id`).
    pub session_id: String,

    /// Amount in minor units.
    pub amount: i64,
}

/// Result of resolving a webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookActionResult {
    pub action: WebhookAction,
    pub data: WebhookSessionData,
}

impl WebhookActionResult {
    pub fn not_supported() -> Self {
        Self {
            action: WebhookAction::NotSupported,
            data: WebhookSessionData {
                session_id: String::new(),
                amount: 0,
            },
        }
    }
}

/// Resolve a PayPal webhook envelope (`{event_type, resource}`).
pub fn resolve_webhook_event(event: &Value) -> WebhookActionResult {
    let event_type = event
        .get("event_type")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let Some((action, shape)) = classify_event(event_type) else {
        return WebhookActionResult::not_supported();
    };

    let empty = Map::new();
    let resource = event
        .get("resource")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let source = match shape {
        ResourceShape::TopLevel => Some(resource),
        ResourceShape::FirstPurchaseUnit => {
            first_defined(resource, &FIRST_PURCHASE_UNIT_PATHS).and_then(|(_, v)| v.as_object())
        }
    }
    .unwrap_or(&empty);

    let session_id = first_string(source, &CUSTOM_ID_PATHS).unwrap_or_default();
    let amount = first_string(source, &AMOUNT_VALUE_PATHS)
        .and_then(|value| parse_decimal_amount(&value).ok())
        .unwrap_or(0);

    WebhookActionResult {
        action,
        data: WebhookSessionData { session_id, amount },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn capture_completed_yields_successful_with_minor_amount() {
        let event = json!({
            "event_type": "PAYMENT.CAPTURE.COMPLETED",
            "resource": { "custom_id": "sess_1", "amount": { "value": "12.34" } }
        });

        let result = resolve_webhook_event(&event);

        assert_eq!(result.action, WebhookAction::Successful);
        assert_eq!(result.data.session_id, "sess_1");
        assert_eq!(result.data.amount, 1234);
    }

    #[test]
    fn unknown_event_is_not_supported() {
        let event = json!({
            "event_type": "BILLING.SUBSCRIPTION.CREATED",
            "resource": { "custom_id": "sess_1", "amount": { "value": "12.34" } }
        });

        let result = resolve_webhook_event(&event);

        assert_eq!(result, WebhookActionResult::not_supported());
        assert_eq!(result.data.amount, 0);
        assert!(result.data.session_id.is_empty());
    }

    #[test]
    fn missing_event_type_is_not_supported() {
        let result = resolve_webhook_event(&json!({ "resource": {} }));
        assert_eq!(result.action, WebhookAction::NotSupported);
    }

    #[test]
    fn denied_capture_is_failed() {
        let event = json!({
            "event_type": "PAYMENT.CAPTURE.DENIED",
            "resource": { "customId": "sess_2", "amount": { "value": "5" } }
        });

        let result = resolve_webhook_event(&event);

        assert_eq!(result.action, WebhookAction::Failed);
        assert_eq!(result.data.session_id, "sess_2");
        assert_eq!(result.data.amount, 500);
    }

    #[test]
    fn order_approved_reads_first_purchase_unit() {
        let event = json!({
            "event_type": "CHECKOUT.ORDER.APPROVED",
            "resource": {
                "id": "ORDER-1",
                "purchase_units": [
                    { "custom_id": "sess_3", "amount": { "currency_code": "USD", "value": "3.50" } },
                    { "custom_id": "other", "amount": { "value": "1.00" } }
                ]
            }
        });

        let result = resolve_webhook_event(&event);

        assert_eq!(result.action, WebhookAction::Authorized);
        assert_eq!(result.data.session_id, "sess_3");
        assert_eq!(result.data.amount, 350);
    }

    #[test]
    fn order_event_accepts_camel_case_units() {
        let event = json!({
            "event_type": "CHECKOUT.ORDER.COMPLETED",
            "resource": {
                "purchaseUnits": [{ "customId": "sess_4", "amount": { "value": "0.99" } }]
            }
        });

        let result = resolve_webhook_event(&event);

        assert_eq!(result.action, WebhookAction::Successful);
        assert_eq!(result.data.session_id, "sess_4");
        assert_eq!(result.data.amount, 99);
    }

    #[test]
    fn unparseable_amount_defaults_to_zero() {
        let event = json!({
            "event_type": "PAYMENT.CAPTURE.COMPLETED",
            "resource": { "custom_id": "sess_5", "amount": { "value": "abc" } }
        });

        let result = resolve_webhook_event(&event);

        assert_eq!(result.action, WebhookAction::Successful);
        assert_eq!(result.data.amount, 0);
    }

    #[test]
    fn action_serializes_to_host_tags() {
        assert_eq!(
            serde_json::to_value(WebhookAction::Successful).unwrap(),
            json!("captured")
        );
        assert_eq!(
            serde_json::to_value(WebhookAction::NotSupported).unwrap(),
            json!("not_supported")
        );
    }
}
