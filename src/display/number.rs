//! Currency-style number formatting
//!
//! Fixed two decimals, thousands separators, parentheses for negatives.
//! What zero and missing values look like is a per-report choice carried in a
//! `ZeroPolicy`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::Money;

/// How a report displays zero and missing values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZeroPolicy {
    /// Shown for null, absent or non-finite values
    pub missing: String,
    /// Shown for an exact zero
    pub zero: String,
}

impl ZeroPolicy {
    pub fn new(missing: impl Into<String>, zero: impl Into<String>) -> Self {
        Self {
            missing: missing.into(),
            zero: zero.into(),
        }
    }

    /// Zero and missing both print "0.00"
    pub fn zero_decimal() -> Self {
        Self::new("0.00", "0.00")
    }

    /// Zero and missing both print "-"
    pub fn dash() -> Self {
        Self::new("-", "-")
    }

    /// Missing prints "N/A", zero prints "0.00"
    pub fn not_available() -> Self {
        Self::new("N/A", "0.00")
    }

    /// Zero and missing print nothing
    pub fn blank() -> Self {
        Self::new("", "")
    }
}

impl Default for ZeroPolicy {
    fn default() -> Self {
        Self::zero_decimal()
    }
}

/// Format an amount under a zero policy
///
/// # Examples
/// ```
/// use portal_reports::display::number::{format_amount, ZeroPolicy};
/// use portal_reports::models::Money;
///
/// let policy = ZeroPolicy::dash();
/// assert_eq!(format_amount(Some(Money::from_cents(-123456)), &policy), "(1,234.56)");
/// assert_eq!(format_amount(Some(Money::zero()), &policy), "-");
/// assert_eq!(format_amount(None, &policy), "-");
/// ```
pub fn format_amount(value: Option<Money>, policy: &ZeroPolicy) -> String {
    match value {
        None => policy.missing.clone(),
        Some(v) if v.is_zero() => policy.zero.clone(),
        Some(v) => format_signed(v),
    }
}

/// Format a float under a zero policy; NaN and infinities count as missing
pub fn format_f64(value: Option<f64>, policy: &ZeroPolicy) -> String {
    format_amount(value.and_then(Money::from_f64), policy)
}

/// Two decimals, thousands separators, negatives in parentheses
pub fn format_signed(value: Money) -> String {
    let body = group_thousands(value.abs());
    if value.is_negative() {
        format!("({})", body)
    } else {
        body
    }
}

/// `numerator / denominator × 100`
///
/// Zero when the denominator is zero or the ratio falls outside the decimal
/// range; zero is the sentinel `format_ratio` prints as "0.00".
pub fn ratio_percent(numerator: Money, denominator: Money) -> Money {
    if denominator.is_zero() {
        return Money::zero();
    }
    numerator
        .checked_div(denominator)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_default()
}

/// Format a ratio; a zero ratio is always the "0.00" sentinel
pub fn format_ratio(value: Money) -> String {
    if value.is_zero() {
        return "0.00".to_string();
    }
    format_signed(value)
}

/// Round half away from zero to 2 places and insert separators
fn group_thousands(value: Money) -> String {
    let mut rounded = value
        .value()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let text = rounded.abs().to_string();

    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (idx, digit) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    format!("{}.{}", grouped, frac_part)
}
