//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are single-currency (USD) and never negative. Arithmetic keeps
//! full decimal precision; rounding to cents happens only for display.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount of money in dollars.
///
/// Serializes as a decimal string (`"999.99"`) and deserializes from
/// either a string or a JSON number.
///
/// ```
/// use electroverse_core::Price;
/// use rust_decimal::Decimal;
///
/// let unit = Price::from_cents(54_999);
/// assert_eq!((unit * 2).to_string(), "$1099.98");
/// assert!(Price::new(Decimal::NEGATIVE_ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The exact amount, at full precision.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The amount rounded half-up to whole cents.
    #[must_use]
    pub fn round_to_cents(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Subtract `other`, stopping at zero instead of going negative.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }

    /// Multiply by a decimal rate (e.g. `0.20` for twenty percent).
    ///
    /// Negative rates yield zero.
    #[must_use]
    pub fn scale(self, rate: Decimal) -> Self {
        Self::new(self.0 * rate).unwrap_or(Self::ZERO)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.round_to_cents())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rejects_negative() {
        assert_eq!(
            Price::new(dec("-0.01")),
            Err(PriceError::Negative(dec("-0.01")))
        );
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_sum_keeps_full_precision() {
        let total: Price = [Price::from_cents(99_999), Price::from_cents(54_999) * 2]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), dec("2099.97"));
    }

    #[test]
    fn test_display_rounds_half_up() {
        assert_eq!(Price::new(dec("419.994")).unwrap().to_string(), "$419.99");
        assert_eq!(Price::new(dec("0.005")).unwrap().to_string(), "$0.01");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_saturating_sub() {
        let ten = Price::from_cents(1_000);
        let five = Price::from_cents(500);
        assert_eq!(ten.saturating_sub(five), five);
        assert_eq!(five.saturating_sub(ten), Price::ZERO);
    }

    #[test]
    fn test_scale() {
        let price = Price::from_cents(50_000);
        assert_eq!(price.scale(dec("0.20")).amount(), dec("100.0000"));
        assert_eq!(price.scale(dec("-1")), Price::ZERO);
    }

    #[test]
    fn test_serde_accepts_string_and_number() {
        let from_str: Price = serde_json::from_str("\"69.99\"").unwrap();
        let from_num: Price = serde_json::from_str("69.99").unwrap();
        assert_eq!(from_str, Price::from_cents(6_999));
        assert_eq!(from_num, Price::from_cents(6_999));
        assert!(serde_json::from_str::<Price>("\"-5\"").is_err());
    }
}
