//! PayPal payment provider adapter.
//!
//! Implements the `PaymentProvider` trait over the PayPal Orders, Payments and
//! Vault APIs. Each host operation maps to one processor call (two for the
//! authorize fallback) plus normalization of the stored payment data.
//!
//! # Configuration
//!
//! ```ignore
//! let options = PaypalOptions { api_key, api_secret, sandbox: Some(true) };
//! let adapter = PaypalPaymentAdapter::from_options(&options)?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::account_holder::{
    account_holder_id, merge_account_holder_data, new_account_holder_data,
};
use crate::domain::field_lookup::{
    resolve_capture_id, resolve_currency_code, resolve_order_id, FLAT_CAPTURE_ID,
    FLAT_CURRENCY_CODE,
};
use crate::domain::money::{format_minor_units, normalize_currency_code};
use crate::domain::webhook::resolve_webhook_event;
use crate::domain::{OrderStatus, PaymentSessionStatus, WebhookActionResult};
use crate::ports::{
    AccountHolderInput, AccountHolderOutput, InitiatePaymentInput, InitiatePaymentOutput,
    PaymentContext, PaymentData, PaymentDataInput, PaymentDataOutput, PaymentError,
    PaymentMethodInput, PaymentMethodOutput, PaymentProvider, PaymentStatusOutput,
    RefundPaymentInput, WebhookPayload,
};

use super::api_types::{
    ApplicationContext, CreateOrderRequest, Money, OrderIntent, PurchaseUnitRequest,
    RefundRequest, SetupTokenPaymentSource, SetupTokenRequest, VaultCustomer,
};
use super::client::{PaypalApi, PaypalClientConfig, PaypalHttpClient, PaypalOptions};

/// Identifier the host registers this provider under.
pub const PAYPAL_PROVIDER_ID: &str = "paypal";

/// Currency used for partial refunds when the stored data names none.
const DEFAULT_REFUND_CURRENCY: &str = "USD";

/// Page size for listing stored payment methods.
const PAYMENT_TOKEN_PAGE_SIZE: u32 = 100;

/// PayPal payment adapter.
pub struct PaypalPaymentAdapter {
    api: Arc<dyn PaypalApi>,
}

impl PaypalPaymentAdapter {
    /// Create an adapter over an existing API client.
    pub fn new(api: Arc<dyn PaypalApi>) -> Self {
        Self { api }
    }

    /// Create an adapter talking to PayPal with the given configuration.
    pub fn from_config(config: PaypalClientConfig) -> Self {
        Self::new(Arc::new(PaypalHttpClient::new(config)))
    }

    /// Create an adapter from host options, rejecting missing credentials.
    pub fn from_options(options: &PaypalOptions) -> Result<Self, PaymentError> {
        let config = PaypalClientConfig::from_options(options)?;
        tracing::info!(sandbox = config.is_sandbox(), "PayPal provider configured");
        Ok(Self::from_config(config))
    }

    fn order_request(input: &InitiatePaymentInput) -> Result<CreateOrderRequest, PaymentError> {
        let currency_code = input
            .currency_code
            .as_deref()
            .ok_or_else(|| PaymentError::invalid_data("Currency code is required"))?;
        let currency_code = normalize_currency_code(currency_code).ok_or_else(|| {
            PaymentError::invalid_data(format!("Invalid currency code: {}", currency_code))
        })?;

        let amount = input
            .amount
            .ok_or_else(|| PaymentError::invalid_data("Amount is required"))?;
        if amount < 0 {
            return Err(PaymentError::invalid_data(format!(
                "Amount must not be negative: {}",
                amount
            )));
        }

        let return_url = string_field(&input.data, "return_url");
        let cancel_url = string_field(&input.data, "cancel_url");
        let application_context = if return_url.is_some() || cancel_url.is_some() {
            Some(ApplicationContext {
                return_url,
                cancel_url,
            })
        } else {
            None
        };

        Ok(CreateOrderRequest {
            intent: OrderIntent::Capture,
            purchase_units: vec![PurchaseUnitRequest {
                reference_id: None,
                amount: Money {
                    currency_code,
                    value: format_minor_units(amount),
                },
                custom_id: string_field(&input.data, "session_id"),
            }],
            application_context,
        })
    }
}

#[async_trait]
impl PaymentProvider for PaypalPaymentAdapter {
    fn identifier(&self) -> &'static str {
        PAYPAL_PROVIDER_ID
    }

    async fn initiate_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> Result<InitiatePaymentOutput, PaymentError> {
        let request = Self::order_request(&input)?;

        let order = self
            .api
            .create_order(&request, input.context.idempotency_key.as_deref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "PayPal create order failed");
                e.into_payment_error(PaymentError::unauthorized, "Failed to create PayPal order")
            })?;

        let status = OrderStatus::parse(&order.status);
        tracing::info!(order_id = %order.id, status = %status, "PayPal order created");

        Ok(InitiatePaymentOutput {
            id: order.id.clone(),
            status: status.to_session_status(),
            data: merge_data(input.data, to_data(&order)),
        })
    }

    async fn authorize_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentStatusOutput, PaymentError> {
        let order_id = resolve_order_id(&input.data)
            .ok_or_else(|| PaymentError::invalid_data("PayPal order id is required"))?;

        match self.api.capture_order(&order_id).await {
            Ok(order) => {
                let status = OrderStatus::parse(&order.status);
                let order_data = to_data(&order);
                let capture_id = resolve_capture_id(&order_data);
                let currency_code = resolve_currency_code(&order_data);

                let mut data = merge_data(input.data, order_data);
                if let Some(capture_id) = &capture_id {
                    data.insert(FLAT_CAPTURE_ID.into(), Value::String(capture_id.clone()));
                }
                if let Some(currency_code) = currency_code {
                    data.insert(FLAT_CURRENCY_CODE.into(), Value::String(currency_code));
                }

                tracing::info!(
                    order_id = %order_id,
                    capture_id = ?capture_id,
                    status = %status,
                    "PayPal order captured"
                );

                Ok(PaymentStatusOutput {
                    status: status.to_session_status(),
                    data,
                })
            }
            Err(e) if e.is_conflict() => {
                tracing::warn!(
                    order_id = %order_id,
                    error = %e,
                    "PayPal order not capturable, falling back to status"
                );
                self.get_payment_status(input).await
            }
            Err(e) => {
                tracing::error!(order_id = %order_id, error = %e, "PayPal capture failed");
                Err(e.into_payment_error(PaymentError::unauthorized, "Failed to capture PayPal order"))
            }
        }
    }

    async fn capture_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentDataOutput, PaymentError> {
        let status = self.get_payment_status(input).await?;
        Ok(PaymentDataOutput { data: status.data })
    }

    async fn cancel_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentDataOutput, PaymentError> {
        Ok(PaymentDataOutput { data: input.data })
    }

    async fn delete_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentDataOutput, PaymentError> {
        Ok(PaymentDataOutput { data: input.data })
    }

    async fn refund_payment(
        &self,
        input: RefundPaymentInput,
    ) -> Result<PaymentDataOutput, PaymentError> {
        let capture_id = resolve_capture_id(&input.data).ok_or_else(|| {
            PaymentError::invalid_data("PayPal capture id is required to refund a payment")
        })?;

        let request = match input.amount {
            Some(amount) if amount < 0 => {
                return Err(PaymentError::invalid_data(format!(
                    "Refund amount must not be negative: {}",
                    amount
                )));
            }
            Some(amount) => {
                let currency_code = resolve_currency_code(&input.data)
                    .unwrap_or_else(|| DEFAULT_REFUND_CURRENCY.to_string());
                RefundRequest {
                    amount: Some(Money {
                        currency_code,
                        value: format_minor_units(amount),
                    }),
                }
            }
            None => RefundRequest::default(),
        };

        let refund = self
            .api
            .refund_capture(&capture_id, &request)
            .await
            .map_err(|e| {
                tracing::error!(capture_id = %capture_id, error = %e, "PayPal refund failed");
                e.into_payment_error(PaymentError::unauthorized, "Failed to refund PayPal capture")
            })?;

        tracing::info!(
            capture_id = %capture_id,
            refund_id = %refund.id,
            status = %refund.status,
            "PayPal capture refunded"
        );

        let mut data = input.data;
        data.insert("refund_id".into(), Value::String(refund.id));
        data.insert("refund_status".into(), Value::String(refund.status));
        Ok(PaymentDataOutput { data })
    }

    async fn retrieve_payment(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentDataOutput, PaymentError> {
        let status = self.get_payment_status(input).await?;
        Ok(PaymentDataOutput { data: status.data })
    }

    async fn update_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> Result<InitiatePaymentOutput, PaymentError> {
        // PayPal orders are not amended; a new order replaces the old one.
        self.initiate_payment(input).await
    }

    async fn get_payment_status(
        &self,
        input: PaymentDataInput,
    ) -> Result<PaymentStatusOutput, PaymentError> {
        let Some(order_id) = resolve_order_id(&input.data) else {
            return Ok(PaymentStatusOutput {
                status: PaymentSessionStatus::Pending,
                data: input.data,
            });
        };

        match self.api.get_order(&order_id).await {
            Ok(order) => {
                let status = OrderStatus::parse(&order.status);
                tracing::debug!(order_id = %order_id, status = %status, "PayPal order fetched");
                Ok(PaymentStatusOutput {
                    status: status.to_session_status(),
                    data: merge_data(input.data, to_data(&order)),
                })
            }
            Err(e) => {
                tracing::error!(order_id = %order_id, error = %e, "PayPal order lookup failed");
                Ok(PaymentStatusOutput {
                    status: PaymentSessionStatus::Error,
                    data: input.data,
                })
            }
        }
    }

    async fn create_account_holder(
        &self,
        input: AccountHolderInput,
    ) -> Result<AccountHolderOutput, PaymentError> {
        if let Some(id) = input.context.account_holder_id() {
            let data = input
                .context
                .account_holder
                .map(|holder| holder.data)
                .unwrap_or_default();
            return Ok(AccountHolderOutput { id, data });
        }

        let customer = input
            .context
            .customer
            .as_ref()
            .filter(|customer| !customer.id.trim().is_empty())
            .ok_or_else(|| {
                PaymentError::invalid_data("Customer id is required to create an account holder")
            })?;

        Ok(AccountHolderOutput {
            id: account_holder_id(&customer.id),
            data: new_account_holder_data(customer),
        })
    }

    async fn update_account_holder(
        &self,
        input: AccountHolderInput,
    ) -> Result<AccountHolderOutput, PaymentError> {
        let id = require_account_holder_id(&input.context)?;
        let existing = input
            .context
            .account_holder
            .as_ref()
            .map(|holder| holder.data.clone())
            .unwrap_or_default();

        let mut data =
            merge_account_holder_data(&existing, &input.data, input.context.customer.as_ref());
        data.insert("id".into(), Value::String(id.clone()));

        Ok(AccountHolderOutput { id, data })
    }

    async fn delete_account_holder(
        &self,
        input: AccountHolderInput,
    ) -> Result<AccountHolderOutput, PaymentError> {
        let id = require_account_holder_id(&input.context)?;
        let data = input
            .context
            .account_holder
            .map(|holder| holder.data)
            .unwrap_or_default();

        Ok(AccountHolderOutput { id, data })
    }

    async fn save_payment_method(
        &self,
        input: PaymentMethodInput,
    ) -> Result<PaymentMethodOutput, PaymentError> {
        let customer_id = require_account_holder_id(&input.context)?;

        let card = input
            .data
            .get("card")
            .cloned()
            .unwrap_or_else(|| Value::Object(input.data.clone()));

        let request = SetupTokenRequest {
            payment_source: SetupTokenPaymentSource { card },
            customer: Some(VaultCustomer {
                id: customer_id.clone(),
            }),
        };

        let token = self
            .api
            .create_setup_token(&request, input.context.idempotency_key.as_deref())
            .await
            .map_err(|e| {
                tracing::error!(customer_id = %customer_id, error = %e, "PayPal setup token failed");
                e.into_payment_error(PaymentError::unauthorized, "Failed to save payment method")
            })?;

        tracing::info!(
            customer_id = %customer_id,
            setup_token_id = %token.id,
            status = %token.status,
            "PayPal setup token created"
        );

        Ok(PaymentMethodOutput {
            id: token.id.clone(),
            data: to_data(&token),
        })
    }

    async fn list_payment_methods(
        &self,
        input: PaymentMethodInput,
    ) -> Result<Vec<PaymentMethodOutput>, PaymentError> {
        let customer_id = require_account_holder_id(&input.context)?;

        match self
            .api
            .list_payment_tokens(&customer_id, PAYMENT_TOKEN_PAGE_SIZE)
            .await
        {
            Ok(list) => Ok(list
                .payment_tokens
                .iter()
                .map(|token| PaymentMethodOutput {
                    id: token.id.clone(),
                    data: to_data(token),
                })
                .collect()),
            Err(e) if e.is_not_found() => {
                tracing::debug!(customer_id = %customer_id, "No PayPal vault customer yet");
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!(customer_id = %customer_id, error = %e, "PayPal payment token list failed");
                Err(e.into_payment_error(PaymentError::invalid_data, "Failed to list payment methods"))
            }
        }
    }

    async fn get_webhook_action_and_data(
        &self,
        payload: WebhookPayload,
    ) -> Result<WebhookActionResult, PaymentError> {
        let result = resolve_webhook_event(&payload.data);

        tracing::info!(
            event_type = payload.data.get("event_type").and_then(serde_json::Value::as_str).unwrap_or_default(),
            action = ?result.action,
            session_id = %result.data.session_id,
            "PayPal webhook resolved"
        );

        Ok(result)
    }
}

/// Account holder id from the context, required by vault and holder operations.
fn require_account_holder_id(context: &PaymentContext) -> Result<String, PaymentError> {
    context
        .account_holder_id()
        .ok_or_else(|| PaymentError::invalid_data("Account holder id is required"))
}

fn string_field(data: &PaymentData, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Processor object as host payment data.
fn to_data<T: Serialize>(value: &T) -> PaymentData {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Overlay processor fields onto the host's data.
fn merge_data(mut base: PaymentData, overlay: PaymentData) -> PaymentData {
    base.extend(overlay);
    base
}
