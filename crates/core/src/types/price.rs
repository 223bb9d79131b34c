//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are unit prices in the store currency. The backend sends them as
//! JSON numbers; they are carried as [`Decimal`] so cart totals never drift.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative price.
///
/// ## Examples
///
/// ```
/// use glamora_core::Price;
///
/// let ring = Price::from_major(100);
/// assert_eq!(ring * 2, Price::from_major(200));
/// assert!(Price::new(rust_decimal::Decimal::NEGATIVE_ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_major(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a price from minor units (e.g., cents).
    #[must_use]
    pub fn from_minor(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

// Both saturate at `Decimal::MAX`: a price is never negative, and a cart
// total must not panic whatever quantity was typed in.
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
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
    use super::*;

    #[test]
    fn test_negative_rejected() {
        let result = Price::new(Decimal::new(-1, 2));
        assert!(matches!(result, Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_zero_allowed() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_line_arithmetic() {
        let total: Price = [Price::from_major(100) * 2, Price::from_minor(1999)]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), Decimal::new(21999, 2));
    }

    #[test]
    fn test_huge_lines_saturate() {
        let huge = Price::new(Decimal::from_i128_with_scale(10_i128.pow(20), 0)).unwrap();

        let line = huge * u32::MAX;
        assert_eq!(line.amount(), Decimal::MAX);
        assert_eq!((line + huge).amount(), Decimal::MAX);
        assert_eq!([line, line].into_iter().sum::<Price>().amount(), Decimal::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_minor(1999).to_string(), "$19.99");
        assert_eq!(Price::from_major(5).to_string(), "$5.00");
    }

    #[test]
    fn test_json_number() {
        let price: Price = serde_json::from_str("129.5").unwrap();
        assert_eq!(price.amount(), Decimal::new(1295, 1));
        assert_eq!(serde_json::to_string(&Price::from_major(100)).unwrap(), "100.0");
    }

    #[test]
    fn test_json_negative_rejected() {
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }
}
