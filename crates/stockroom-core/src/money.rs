//! # Money Module
//!
//! Provides the `Money` type for product prices and transaction costs.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  As floats:   9.99 × -3 = -29.970000000000002  ❌                       │
//! │  As cents:     999 × -3 = -2997                ✅ exactly -$29.97       │
//! │                                                                         │
//! │  Prices and costs are held and computed as integer cents. Only the     │
//! │  JSON boundary speaks decimals:                                        │
//! │                                                                         │
//! │     JSON  "price": 9.99  ──► Money(999) ──► "price": 9.99  JSON        │
//! │     DB    price_cents = 999 (INTEGER column)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::from_cents(999); // $9.99
//! let restock = price.checked_multiply_quantity(4).unwrap();
//! assert_eq!(restock.cents(), 3996);
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Neg;

/// Largest magnitude (in cents) accepted from a decimal. Beyond 2^53 an f64
/// no longer holds every integer exactly.
const MAX_DECIMAL_CENTS: f64 = 9_007_199_254_740_992.0;

/// Tolerance when checking that a decimal has no sub-cent digits.
const SUB_CENT_EPSILON: f64 = 1e-6;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a sale recorded with a negative delta has a negative
///   total cost
/// - **decimal serde**: serializes as a JSON number in major units (`9.99`),
///   and rejects input with more than two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_cents(999);
    /// assert_eq!(price.cents(), 999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount in major units to Money.
    ///
    /// Returns `None` for non-finite values, values outside the exactly
    /// representable range, and values with fractions of a cent.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(9.99), Some(Money::from_cents(999)));
    /// assert_eq!(Money::from_decimal(9.999), None);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }

        let scaled = amount * 100.0;
        let cents = scaled.round();

        if cents.abs() > MAX_DECIMAL_CENTS || (scaled - cents).abs() > SUB_CENT_EPSILON {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// The amount in major units, for the JSON boundary.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a signed quantity, or `None` on overflow.
    ///
    /// Used by the ledger, where the quantity comes straight from a client.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(999);
    /// assert_eq!(unit_price.checked_multiply_quantity(-3).unwrap().cents(), -2997);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable format for logs and tests, e.g. `-$29.97`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid amount {amount}: expected a finite decimal with at most two decimal places"
            ))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(999);
        assert_eq!(money.cents(), 999);
        assert_eq!(money.dollars(), 9);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(999).to_string(), "$9.99");
        assert_eq!(Money::from_cents(-2997).to_string(), "-$29.97");
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
        assert_eq!(Money::default().to_string(), "$0.00");
    }

    #[test]
    fn test_sale_cost_is_negative() {
        let price = Money::from_cents(999);
        let cost = price.checked_multiply_quantity(-3).unwrap();
        assert!(cost.is_negative());
        assert_eq!(cost, -Money::from_cents(2997));
    }

    #[test]
    fn test_checked_multiply_overflow() {
        let price = Money::from_cents(i64::MAX / 2);
        assert!(price.checked_multiply_quantity(3).is_none());
        assert_eq!(
            price.checked_multiply_quantity(1),
            Some(Money::from_cents(i64::MAX / 2))
        );
    }

    #[test]
    fn test_from_decimal() {
        assert_eq!(Money::from_decimal(9.99), Some(Money::from_cents(999)));
        assert_eq!(Money::from_decimal(0.1 + 0.2), Some(Money::from_cents(30)));
        assert_eq!(Money::from_decimal(-29.97), Some(Money::from_cents(-2997)));
        assert_eq!(Money::from_decimal(5.0), Some(Money::from_cents(500)));

        assert_eq!(Money::from_decimal(9.995), None);
        assert_eq!(Money::from_decimal(f64::NAN), None);
        assert_eq!(Money::from_decimal(f64::INFINITY), None);
        assert_eq!(Money::from_decimal(1e17), None);
    }

    #[test]
    fn test_serializes_as_decimal() {
        let json = serde_json::to_string(&Money::from_cents(-2997)).unwrap();
        assert_eq!(json, "-29.97");
        assert_eq!(serde_json::to_string(&Money::from_cents(999)).unwrap(), "9.99");

        let back: Money = serde_json::from_str("9.99").unwrap();
        assert_eq!(back.cents(), 999);

        // Whole numbers are accepted as major units.
        let whole: Money = serde_json::from_str("12").unwrap();
        assert_eq!(whole.cents(), 1200);

        assert!(serde_json::from_str::<Money>("1.234").is_err());
        assert!(serde_json::from_str::<Money>("\"9.99\"").is_err());
    }
}
