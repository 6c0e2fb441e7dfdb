//! Amount and currency conversion between the host and PayPal.
//!
//! The host exchanges amounts as integer minor units (cents). PayPal expects
//! and returns decimal strings with two fraction digits. Every amount that
//! crosses the boundary goes through this module.

use thiserror::Error;

/// Number of fraction digits PayPal amounts are exchanged with.
const FRACTION_DIGITS: u32 = 2;

/// Minor units per major unit (10^FRACTION_DIGITS).
const MINOR_PER_MAJOR: i64 = 100;

/// Errors parsing a PayPal decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("Amount is empty")]
    Empty,

    #[error("Amount '{0}' is not a decimal number")]
    InvalidFormat(String),

    #[error("Amount '{0}' is out of range")]
    OutOfRange(String),
}

/// Format integer minor units as a PayPal decimal string.
///
/// Always renders exactly two fraction digits: `350` → `"3.50"`,
/// `100` → `"1.00"`, `5` → `"0.05"`.
pub fn format_minor_units(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let per_major = MINOR_PER_MAJOR as u64;
    format!(
        "{}{}.{:0width$}",
        sign,
        abs / per_major,
        abs % per_major,
        width = FRACTION_DIGITS as usize
    )
}

/// Parse a PayPal decimal string into integer minor units.
///
/// Accepts an optional sign, an integer part and any number of fraction
/// digits. Digits beyond the second fraction digit are rounded half-up:
/// `"12.34"` → `1234`, `"12.3"` → `1230`, `"12"` → `1200`, `"0.125"` → `13`.
pub fn parse_decimal_amount(value: &str) -> Result<i64, AmountParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(AmountParseError::InvalidFormat(value.to_string()));
    }

    let out_of_range = || AmountParseError::OutOfRange(value.to_string());

    let major: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| out_of_range())?
    };

    let mut digits = frac_part.bytes().map(|b| i64::from(b - b'0'));
    let mut fraction = 0i64;
    for _ in 0..FRACTION_DIGITS {
        fraction = fraction * 10 + digits.next().unwrap_or(0);
    }
    if digits.next().is_some_and(|d| d >= 5) {
        fraction += 1;
    }

    let minor = major
        .checked_mul(MINOR_PER_MAJOR)
        .and_then(|m| m.checked_add(fraction))
        .ok_or_else(out_of_range)?;

    Ok(if negative { -minor } else { minor })
}

/// Normalize a host currency code into PayPal's upper-case ISO 4217 form.
///
/// Returns `None` when the code is not three ASCII letters.
pub fn normalize_currency_code(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}
