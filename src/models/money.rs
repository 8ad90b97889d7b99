//! Money type for representing report amounts
//!
//! Wraps a `rust_decimal::Decimal` so that accumulators keep full precision.
//! Rounding to two places only ever happens in the number formatter, at
//! render/export time. The arithmetic operators saturate at the `Decimal`
//! range instead of panicking; use `checked_add` to detect overflow.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A monetary (or quantity) amount at full decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money amount from a decimal value
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create a Money amount from whole units
    ///
    /// # Examples
    /// ```
    /// use portal_reports::models::Money;
    /// assert_eq!(Money::from_units(80).to_string(), "80.00");
    /// ```
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a Money amount from cents (hundredths)
    ///
    /// # Examples
    /// ```
    /// use portal_reports::models::Money;
    /// assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Convert a floating point value, returning `None` for NaN or infinities
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_f64(value).map(Self)
    }

    /// Get the underlying decimal value
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Add, returning `None` on overflow
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Divide, returning `None` when the divisor is zero or the result overflows
    pub fn checked_div(&self, divisor: Money) -> Option<Money> {
        self.0.checked_div(divisor.0).map(Self)
    }

    /// Multiply by a factor, returning `None` on overflow
    pub fn checked_mul(&self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(Self)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "1234.5", "-10.50", "$1,234.50", "(50.00)" and "1.5e3".
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        // Accounting negatives: "(50.00)"
        let (negative, body) = match trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(inner) => (true, inner.trim()),
            None => (false, trimmed),
        };

        let cleaned: String = body
            .chars()
            .filter(|c| *c != ',' && *c != '$' && !c.is_whitespace())
            .collect();

        let value = Decimal::from_str(&cleaned)
            .or_else(|_| Decimal::from_scientific(&cleaned))
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value.abs() } else { value }))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self::from_units(value)
    }
}

impl From<i32> for Money {
    fn from(value: i32) -> Self {
        Self::from_units(i64::from(value))
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::Empty => write!(f, "Empty money value"),
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.value(), Decimal::new(1050, 2));
        assert_eq!(m.to_string(), "10.50");
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_units(80).to_string(), "80.00");
        assert_eq!(Money::zero().to_string(), "0.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(100);
        let b = Money::from_units(-50);

        assert_eq!(a + b, Money::from_units(50));
        assert_eq!(a - b, Money::from_units(150));
        assert_eq!(-a, Money::from_units(-100));
    }

    #[test]
    fn test_full_precision_accumulation() {
        // 0.1 + 0.2 is exact in decimal
        let total: Money = [Money::parse("0.1").unwrap(), Money::parse("0.2").unwrap()]
            .into_iter()
            .sum();
        assert_eq!(total, Money::parse("0.3").unwrap());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap(), Money::from_cents(1050));
        assert_eq!(Money::parse("$1,234.50").unwrap(), Money::from_cents(123450));
        assert_eq!(Money::parse("-10.50").unwrap(), Money::from_cents(-1050));
        assert_eq!(Money::parse("(50.00)").unwrap(), Money::from_units(-50));
        assert_eq!(Money::parse("1.5e3").unwrap(), Money::from_units(1500));
        assert_eq!(Money::parse("  7 ").unwrap(), Money::from_units(7));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Money::parse("   "), Err(MoneyParseError::Empty));
        assert!(matches!(
            Money::parse("abc"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(Money::from_f64(f64::NAN).is_none());
        assert!(Money::from_f64(f64::INFINITY).is_none());
        assert_eq!(Money::from_f64(12.5), Some(Money::from_cents(1250)));
    }

    #[test]
    fn test_arithmetic_saturates_at_range() {
        let big = Money::parse("50000000000000000000000000000").unwrap();
        assert_eq!(big + big, Money::new(Decimal::MAX));
        assert_eq!(-big - big, Money::new(Decimal::MIN));

        let mut total = big;
        total += big;
        assert_eq!(total, Money::new(Decimal::MAX));

        let summed: Money = [big, big, -big].into_iter().sum();
        assert_eq!(summed, Money::new(Decimal::MAX) - big);
    }

    #[test]
    fn test_checked_add_and_mul() {
        let big = Money::parse("50000000000000000000000000000").unwrap();
        assert_eq!(big.checked_add(big), None);
        assert_eq!(big.checked_mul(Decimal::ONE_HUNDRED), None);
        assert_eq!(
            Money::from_units(2).checked_add(Money::from_units(3)),
            Some(Money::from_units(5))
        );
        assert_eq!(
            Money::from_cents(25).checked_mul(Decimal::ONE_HUNDRED),
            Some(Money::from_units(25))
        );
    }

    #[test]
    fn test_checked_div() {
        let a = Money::from_units(10);
        assert_eq!(a.checked_div(Money::zero()), None);
        assert_eq!(a.checked_div(Money::from_units(4)), Some(Money::from_cents(250)));
    }

    #[test]
    fn test_is_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(!Money::zero().is_positive());
        assert!(Money::from_units(1).is_positive());
        assert!(Money::from_units(-1).is_negative());
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
