//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - The host platform's payment provider contract

mod payment_provider;

pub use payment_provider::{
    AccountHolderInput, AccountHolderOutput, AccountHolderRef, InitiatePaymentInput,
    InitiatePaymentOutput, PaymentContext, PaymentData, PaymentDataInput, PaymentDataOutput,
    PaymentError, PaymentErrorCode, PaymentMethodInput, PaymentMethodOutput, PaymentProvider,
    PaymentStatusOutput, RefundPaymentInput, WebhookPayload,
};
