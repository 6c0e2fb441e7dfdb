//! Order status (PayPal) and payment session status (host).
//!
//! The adapter never transitions a status itself. It only reads PayPal's
//! order status and maps it onto the host's session status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a PayPal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Saved,
    Approved,
    PayerActionRequired,
    Completed,
    Voided,
    /// Any status value PayPal adds later.
    Unknown(String),
}

impl OrderStatus {
    /// Parse PayPal's SCREAMING_SNAKE_CASE status. Never fails.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "CREATED" => OrderStatus::Created,
            "SAVED" => OrderStatus::Saved,
            "APPROVED" => OrderStatus::Approved,
            "PAYER_ACTION_REQUIRED" => OrderStatus::PayerActionRequired,
            "COMPLETED" => OrderStatus::Completed,
            "VOIDED" => OrderStatus::Voided,
            _ => OrderStatus::Unknown(value.to_string()),
        }
    }

    /// Map to the host's session status.
    pub fn to_session_status(&self) -> PaymentSessionStatus {
        match self {
            OrderStatus::Created | OrderStatus::Saved | OrderStatus::Approved => {
                PaymentSessionStatus::Pending
            }
            OrderStatus::PayerActionRequired => PaymentSessionStatus::RequiresMore,
            OrderStatus::Completed => PaymentSessionStatus::Captured,
            OrderStatus::Voided => PaymentSessionStatus::Canceled,
            OrderStatus::Unknown(_) => PaymentSessionStatus::Pending,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Saved => "SAVED",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::PayerActionRequired => "PAYER_ACTION_REQUIRED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Voided => "VOIDED",
            OrderStatus::Unknown(other) => other,
        };
        write!(f, "{}", s)
    }
}

/// Payment session status as the host understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSessionStatus {
    Pending,
    Authorized,
    Captured,
    RequiresMore,
    Error,
    Canceled,
}

impl fmt::Display for PaymentSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentSessionStatus::Pending => "pending",
            PaymentSessionStatus::Authorized => "authorized",
            PaymentSessionStatus::Captured => "captured",
            PaymentSessionStatus::RequiresMore => "requires_more",
            PaymentSessionStatus::Error => "error",
            PaymentSessionStatus::Canceled => "canceled",
        };
        write!(f, "{}", s)
    }
}
