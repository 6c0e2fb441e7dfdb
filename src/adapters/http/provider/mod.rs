//! HTTP adapter for the payment provider.
//!
//! Exposes every `PaymentProvider` operation as a JSON endpoint:
//! - `GET /` - Provider identifier
//! - `POST /payments/{initiate,authorize,capture,cancel,delete,refund,retrieve,update,status}`
//! - `POST /account-holders/{create,update,delete}`
//! - `POST /payment-methods/{save,list}`
//! - `POST /webhooks/paypal` - Resolve PayPal webhook events

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, PaymentMethodListResponse, ProviderInfoResponse};
pub use handlers::{ProviderApiError, ProviderAppState};
pub use routes::provider_router;
