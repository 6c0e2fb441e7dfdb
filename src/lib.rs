//! PayPal Payment Provider
//!
//! Adapts an e-commerce host's payment-provider contract to PayPal's REST
//! API: orders, captures, refunds, vaulted payment methods and webhook
//! resolution.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
