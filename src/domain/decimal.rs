//! Lossless decimal type for exchange-reported amounts.
//!
//! Binance encodes prices, quantities and P&L as JSON strings. Parsing them
//! straight into `rust_decimal` keeps sums such as commission and realized P&L
//! exact, so conservation checks hold without an epsilon.

use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// Exact decimal amount.
///
/// Serializes as a JSON string and accepts either a string or a number on
/// input.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Decimal(RustDecimal);

impl Decimal {
    pub const ZERO: Decimal = Decimal(RustDecimal::ZERO);
    pub const ONE: Decimal = Decimal(RustDecimal::ONE);

    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse from a decimal string such as `"0.001"` or `"-12.5"`.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s.trim()).map(Decimal)
    }

    /// `mantissa × 10^-scale`, e.g. `from_parts(99, 2)` is `0.99`.
    pub const fn from_parts(mantissa: i64, scale: u32) -> Self {
        Decimal(RustDecimal::from_parts(
            mantissa.unsigned_abs() as u32,
            0,
            0,
            mantissa < 0,
            scale,
        ))
    }

    pub fn from_count(n: usize) -> Self {
        Decimal(RustDecimal::from(n as u64))
    }

    /// Normalized text without trailing zeros or exponent.
    pub fn to_canonical_string(&self) -> String {
        self.0.normalize().to_string()
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Division that yields `None` for a zero divisor or on overflow.
    pub fn checked_div(&self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_div(rhs.0).map(Decimal)
    }

    /// `self / rhs`, or zero when `rhs` is zero.
    pub fn ratio_or_zero(&self, rhs: Decimal) -> Decimal {
        self.checked_div(rhs).unwrap_or(Self::ZERO)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 += rhs.0;
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl Div for Decimal {
    type Output = Decimal;

    fn div(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 / rhs.0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Decimal {
        iter.fold(Decimal::ZERO, |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Decimal {
        iter.fold(Decimal::ZERO, |acc, d| acc + *d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn parses_exchange_strings() {
        assert_eq!(d("0.00100000").to_canonical_string(), "0.001");
        assert_eq!(d(" -12.50 ").to_canonical_string(), "-12.5");
        assert!(Decimal::from_str_canonical("abc").is_err());
    }

    #[test]
    fn from_parts_builds_fractions() {
        assert_eq!(Decimal::from_parts(99, 2), d("0.99"));
        assert_eq!(Decimal::from_parts(-5, 1), d("-0.5"));
    }

    #[test]
    fn checked_div_guards_zero_divisor() {
        assert_eq!(d("10").checked_div(Decimal::ZERO), None);
        assert_eq!(d("10").checked_div(d("4")), Some(d("2.5")));
        assert_eq!(d("3").ratio_or_zero(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn sign_checks_treat_negative_zero_as_zero() {
        let neg_zero = -Decimal::ZERO;
        assert!(neg_zero.is_zero());
        assert!(!neg_zero.is_negative());
        assert!(d("-0.1").is_negative());
        assert!(d("0.1").is_positive());
    }

    #[test]
    fn sums_are_exact() {
        let parts = [d("0.1"), d("0.2"), d("0.3")];
        let total: Decimal = parts.iter().sum();
        assert_eq!(total, d("0.6"));
    }

    #[test]
    fn json_uses_string_form() {
        let json = serde_json::to_value(d("123.456")).unwrap();
        assert_eq!(json, serde_json::json!("123.456"));

        let from_str: Decimal = serde_json::from_str("\"1.5\"").unwrap();
        let from_num: Decimal = serde_json::from_str("1.5").unwrap();
        assert_eq!(from_str, from_num);
    }
}
