//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `paypal` - PayPal REST client and `PaymentProvider` implementation
//! - `http` - axum binding exposing the provider over HTTP

pub mod http;
pub mod paypal;

pub use paypal::{MockPaypalApi, PaypalHttpClient, PaypalPaymentAdapter};
