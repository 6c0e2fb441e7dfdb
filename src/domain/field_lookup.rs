//! Ordered field lookup over host payment data and PayPal payloads.
//!
//! Payment data reaches the adapter in more than one shape: flat fields the
//! adapter stored itself, camelCase objects persisted by SDK-based clients,
//! and snake_case objects straight off the wire. Each value the adapter needs
//! is described by an ordered list of [`FieldPath`]s; the first path that
//! yields a usable value wins.

use serde_json::{Map, Value};

use super::money::normalize_currency_code;

/// One step into a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member.
    Key(&'static str),
    /// Array element.
    Index(usize),
}

use PathSegment::{Index, Key};

/// A named path into a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    name: &'static str,
    segments: &'static [PathSegment],
}

impl FieldPath {
    pub const fn new(name: &'static str, segments: &'static [PathSegment]) -> Self {
        Self { name, segments }
    }

    /// Human-readable path, used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Walk the path from an object root.
    pub fn lookup<'a>(&self, root: &'a Map<String, Value>) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = match first {
            Key(key) => root.get(*key)?,
            Index(_) => return None,
        };
        for segment in rest {
            current = match segment {
                Key(key) => current.as_object()?.get(*key)?,
                Index(i) => current.as_array()?.get(*i)?,
            };
        }
        Some(current)
    }
}

/// Return the first non-null value along `paths`, with the path that produced it.
pub fn first_defined<'a>(
    root: &'a Map<String, Value>,
    paths: &[FieldPath],
) -> Option<(FieldPath, &'a Value)> {
    paths.iter().find_map(|path| {
        path.lookup(root)
            .filter(|value| !value.is_null())
            .map(|value| (*path, value))
    })
}

/// Return the first non-empty string along `paths`.
pub fn first_string(root: &Map<String, Value>, paths: &[FieldPath]) -> Option<String> {
    paths.iter().find_map(|path| {
        path.lookup(root)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Flat capture id written by the adapter after a successful capture.
pub const FLAT_CAPTURE_ID: &str = "capture_id";

/// Flat currency code written by the adapter after a successful capture.
pub const FLAT_CURRENCY_CODE: &str = "currency_code";

/// Capture id precedence: flat → camelCase → snake_case → fallback.
pub const CAPTURE_ID_PATHS: [FieldPath; 4] = [
    FieldPath::new("capture_id", &[Key(FLAT_CAPTURE_ID)]),
    FieldPath::new(
        "purchaseUnits[0].payments.captures[0].id",
        &[Key("purchaseUnits"), Index(0), Key("payments"), Key("captures"), Index(0), Key("id")],
    ),
    FieldPath::new(
        "purchase_units[0].payments.captures[0].id",
        &[Key("purchase_units"), Index(0), Key("payments"), Key("captures"), Index(0), Key("id")],
    ),
    FieldPath::new("captures[0].id", &[Key("captures"), Index(0), Key("id")]),
];

/// Currency code precedence: flat → camelCase → snake_case → fallback.
pub const CURRENCY_CODE_PATHS: [FieldPath; 4] = [
    FieldPath::new("currency_code", &[Key(FLAT_CURRENCY_CODE)]),
    FieldPath::new(
        "purchaseUnits[0].amount.currencyCode",
        &[Key("purchaseUnits"), Index(0), Key("amount"), Key("currencyCode")],
    ),
    FieldPath::new(
        "purchase_units[0].amount.currency_code",
        &[Key("purchase_units"), Index(0), Key("amount"), Key("currency_code")],
    ),
    FieldPath::new("currency", &[Key("currency")]),
];

/// PayPal order id stored in host data.
pub const ORDER_ID_PATHS: [FieldPath; 2] = [
    FieldPath::new("id", &[Key("id")]),
    FieldPath::new("order_id", &[Key("order_id")]),
];

/// Host session id carried as the purchase unit's custom id.
pub const CUSTOM_ID_PATHS: [FieldPath; 2] = [
    FieldPath::new("custom_id", &[Key("custom_id")]),
    FieldPath::new("customId", &[Key("customId")]),
];

/// First purchase unit of an order-shaped payload.
pub const FIRST_PURCHASE_UNIT_PATHS: [FieldPath; 2] = [
    FieldPath::new("purchase_units[0]", &[Key("purchase_units"), Index(0)]),
    FieldPath::new("purchaseUnits[0]", &[Key("purchaseUnits"), Index(0)]),
];

/// Decimal amount value on a capture or purchase unit.
pub const AMOUNT_VALUE_PATHS: [FieldPath; 1] =
    [FieldPath::new("amount.value", &[Key("amount"), Key("value")])];

/// Account holder id in host account-holder data.
pub const ACCOUNT_HOLDER_ID_PATHS: [FieldPath; 1] = [FieldPath::new("id", &[Key("id")])];

pub fn resolve_capture_id(data: &Map<String, Value>) -> Option<String> {
    first_string(data, &CAPTURE_ID_PATHS)
}

/// First currency along the precedence that is a valid ISO code, uppercased.
/// A malformed value at one level falls through to the next.
pub fn resolve_currency_code(data: &Map<String, Value>) -> Option<String> {
    CURRENCY_CODE_PATHS.iter().find_map(|path| {
        path.lookup(data)
            .and_then(Value::as_str)
            .and_then(normalize_currency_code)
    })
}

pub fn resolve_order_id(data: &Map<String, Value>) -> Option<String> {
    first_string(data, &ORDER_ID_PATHS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn captures(id: &str) -> Value {
        json!([{ "payments": { "captures": [{ "id": id }] } }])
    }

    #[test]
    fn flat_capture_id_wins_over_nested_paths() {
        let data = obj(json!({
            "capture_id": "flat",
            "purchaseUnits": captures("camel"),
            "purchase_units": captures("snake"),
        }));
        assert_eq!(resolve_capture_id(&data), Some("flat".to_string()));
    }

    #[test]
    fn camel_case_wins_over_snake_case() {
        let data = obj(json!({
            "purchaseUnits": captures("camel"),
            "purchase_units": captures("snake"),
        }));
        assert_eq!(resolve_capture_id(&data), Some("camel".to_string()));
    }

    #[test]
    fn snake_case_used_when_camel_case_missing() {
        let data = obj(json!({ "purchase_units": captures("snake") }));
        assert_eq!(resolve_capture_id(&data), Some("snake".to_string()));
    }

    #[test]
    fn fallback_path_used_last() {
        let data = obj(json!({ "captures": [{ "id": "fallback" }] }));
        assert_eq!(resolve_capture_id(&data), Some("fallback".to_string()));
    }

    #[test]
    fn empty_strings_are_skipped() {
        let data = obj(json!({
            "capture_id": "  ",
            "purchase_units": captures("snake"),
        }));
        assert_eq!(resolve_capture_id(&data), Some("snake".to_string()));
    }

    #[test]
    fn missing_capture_resolves_to_none() {
        let data = obj(json!({ "id": "ORDER-1", "purchase_units": [{ "payments": {} }] }));
        assert_eq!(resolve_capture_id(&data), None);
    }

    #[test]
    fn currency_code_follows_same_precedence() {
        let data = obj(json!({
            "purchaseUnits": [{ "amount": { "currencyCode": "EUR" } }],
            "purchase_units": [{ "amount": { "currency_code": "GBP" } }],
            "currency": "USD",
        }));
        assert_eq!(resolve_currency_code(&data), Some("EUR".to_string()));

        let data = obj(json!({ "currency": "CAD" }));
        assert_eq!(resolve_currency_code(&data), Some("CAD".to_string()));
    }

    #[test]
    fn malformed_currency_falls_through_to_next_level() {
        let data = obj(json!({
            "currency_code": "euro",
            "purchaseUnits": [{ "amount": { "currencyCode": 978 } }],
            "purchase_units": [{ "amount": { "currency_code": "eur" } }],
            "currency": "USD",
        }));
        assert_eq!(resolve_currency_code(&data), Some("EUR".to_string()));

        let data = obj(json!({ "currency_code": "", "currency": "xx" }));
        assert_eq!(resolve_currency_code(&data), None);
    }

    #[test]
    fn first_defined_reports_matching_path() {
        let data = obj(json!({ "purchaseUnits": [{ "customId": "sess" }] }));
        let (path, unit) = first_defined(&data, &FIRST_PURCHASE_UNIT_PATHS).unwrap();
        assert_eq!(path.name(), "purchaseUnits[0]");
        assert_eq!(unit["customId"], "sess");
    }

    #[test]
    fn lookup_tolerates_shape_mismatches() {
        let data = obj(json!({ "purchase_units": "not-an-array" }));
        assert_eq!(resolve_capture_id(&data), None);
        assert!(first_defined(&data, &FIRST_PURCHASE_UNIT_PATHS).is_none());
    }
}
