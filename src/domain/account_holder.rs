//! Account holders.
//!
//! PayPal has no customer object behind an account holder here. The id is
//! synthesized from the host customer id and the Vault API uses it as the
//! customer id for setup and payment tokens.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix for synthesized account holder ids.
pub const ACCOUNT_HOLDER_PREFIX: &str = "paypal_";

/// Customer record supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCustomer {
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}

impl HostCustomer {
    /// "First Last", skipping missing parts. `None` when both are missing.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Derive the account holder id for a host customer.
pub fn account_holder_id(customer_id: &str) -> String {
    format!("{}{}", ACCOUNT_HOLDER_PREFIX, customer_id)
}

/// Initial account holder data for a customer.
pub fn new_account_holder_data(customer: &HostCustomer) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("id".into(), Value::String(account_holder_id(&customer.id)));
    apply_customer_details(&mut data, customer);
    data
}

/// Merge an update over existing account holder data.
///
/// Fields in `update` overwrite `existing`. The customer's current email and
/// name win over both.
pub fn merge_account_holder_data(
    existing: &Map<String, Value>,
    update: &Map<String, Value>,
    customer: Option<&HostCustomer>,
) -> Map<String, Value> {
    let mut merged = existing.clone();
    for (key, value) in update {
        merged.insert(key.clone(), value.clone());
    }
    if let Some(customer) = customer {
        apply_customer_details(&mut merged, customer);
    }
    merged
}

fn apply_customer_details(data: &mut Map<String, Value>, customer: &HostCustomer) {
    if let Some(email) = customer.email.as_deref().filter(|e| !e.is_empty()) {
        data.insert("email".into(), Value::String(email.to_string()));
    }
    if let Some(name) = customer.full_name() {
        data.insert("name".into(), Value::String(name));
    }
}
