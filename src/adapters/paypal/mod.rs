//! PayPal payment provider adapter.
//!
//! Implements the `PaymentProvider` port over PayPal's REST API:
//! - Orders v2 for initiate, capture and status
//! - Payments v2 for refunds
//! - Vault v3 for saved payment methods
//!
//! # Security
//!
//! - OAuth2 client credentials, client secret held as `secrecy::SecretString`
//! - Access tokens are cached in memory only
//!
//! # Configuration
//!
//! `PaypalClientConfig` is built either from `PaypalOptions` (api key, api
//! secret, sandbox flag) or from the service configuration in `crate::config`.

mod api_types;
mod client;
mod mock_api;
mod paypal_adapter;

pub use api_types::{
    ApplicationContext, Capture, CreateOrderRequest, Money, Order, OrderIntent, PaymentToken,
    PaymentTokenList, PurchaseUnit, PurchaseUnitRequest, Refund, RefundRequest, SetupToken,
    SetupTokenPaymentSource, SetupTokenRequest, VaultCustomer,
};
pub use client::{
    PaypalApi, PaypalApiError, PaypalClientConfig, PaypalHttpClient, PaypalOptions,
    LIVE_BASE_URL, PAYPAL_REQUEST_ID, SANDBOX_BASE_URL,
};
pub use mock_api::{MethodCall, MockPaypalApi};
pub use paypal_adapter::{PaypalPaymentAdapter, PAYPAL_PROVIDER_ID};
