//! Domain layer: pure conversion and mapping rules.
//!
//! # Module Organization
//!
//! - `money` - Minor-unit ↔ decimal amount conversion, currency codes
//! - `session_status` - PayPal order status and host session status mapping
//! - `field_lookup` - Ordered lookup paths over payment data
//! - `webhook` - Webhook event classification and resolution
//! - `account_holder` - Account holder id derivation and data merging

pub mod account_holder;
pub mod field_lookup;
pub mod money;
pub mod session_status;
pub mod webhook;

pub use account_holder::HostCustomer;
pub use money::AmountParseError;
pub use session_status::{OrderStatus, PaymentSessionStatus};
pub use webhook::{WebhookAction, WebhookActionResult, WebhookSessionData};
