//! # Money Module
//!
//! Provides the `Money` type used for every price, subtotal and discount in
//! the storefront.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A browser cart summing float prices:                                   │
//! │    15.0 * 0.9 + 20.0 * 0.9 = 31.499999999999996                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Movie prices are stored as cents (1500, 2000)                        │
//! │    Discounts are computed once, on the subtotal, in basis points        │
//! │    3500 cents at 1000 bps → 350 cents off → 3150 cents                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use marquee_core::money::Money;
//!
//! let price = Money::from_dollars(15);     // $15.00
//! let subtotal = price + Money::from_dollars(20);
//! assert_eq!(subtotal.cents(), 3500);
//!
//! // 10% of $35.00
//! assert_eq!(subtotal.percentage(1000).cents(), 350);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Movie.vote_average ──► list_price() ──► Movie.price                    │
/// │                                               │                         │
/// │                                               ▼                         │
/// │                                    CartLineItem.unit_price              │
/// │                                               │                         │
/// │                                               ▼                         │
/// │  PricingResult.subtotal ──► discount_amount ──► final_total             │
/// │                                                    │                    │
/// │                                                    ▼                    │
/// │                                        PaymentRequest.amount            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use marquee_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole dollars.
    ///
    /// Catalog list prices are always whole dollars.
    #[inline]
    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars * 100)
    }

    /// Converts a decimal amount (e.g. a JSON number) to cents, rounding to
    /// the nearest cent.
    ///
    /// Returns `None` for NaN, infinities and amounts that do not fit in
    /// `i64` cents. Sign is preserved; rejecting negatives is the job of
    /// [`crate::validation`].
    ///
    /// ```rust
    /// use marquee_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.5), Some(Money::from_cents(1250)));
    /// assert_eq!(Money::from_decimal(f64::NAN), None);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }

        let cents = (amount * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `bps` basis points of this amount, rounded half-up to the cent.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount * bps + 5000) / 10000`.
    ///
    /// ```rust
    /// use marquee_core::money::Money;
    ///
    /// // 20% of $60.00
    /// assert_eq!(Money::from_dollars(60).percentage(2000), Money::from_dollars(12));
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money(part as i64)
    }

    /// Formats the amount as a plain decimal without currency symbol.
    ///
    /// Used for the payment QR payload.
    ///
    /// ```rust
    /// use marquee_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(3600).to_decimal_string(), "36.00");
    /// assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.34`.
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

// Arithmetic saturates at the i64 bounds so summing any cart stays total.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Lets a cart subtotal be written as `items.map(|i| i.unit_price).sum()`.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dollars() {
        let money = Money::from_dollars(15);
        assert_eq!(money.cents(), 1500);
        assert_eq!(money.dollars(), 15);
        assert_eq!(money.cents_part(), 0);
    }

    #[test]
    fn test_from_decimal() {
        assert_eq!(Money::from_decimal(10.0), Some(Money::from_cents(1000)));
        assert_eq!(Money::from_decimal(19.99), Some(Money::from_cents(1999)));
        assert_eq!(Money::from_decimal(-2.5), Some(Money::from_cents(-250)));
        assert_eq!(Money::from_decimal(f64::INFINITY), None);
        assert_eq!(Money::from_decimal(f64::NAN), None);
        assert_eq!(Money::from_decimal(1e300), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(3600)), "$36.00");
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_dollars(10);
        let b = Money::from_dollars(4);

        assert_eq!((a + b).cents(), 1400);
        assert_eq!((a - b).cents(), 600);

        let mut c = a;
        c += b;
        assert_eq!(c, Money::from_dollars(14));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let half = Money::from_cents(i64::MAX / 2 + 1);

        assert_eq!(half + half, Money::from_cents(i64::MAX));
        assert_eq!(Money::from_cents(i64::MIN) - Money::from_cents(1), Money::from_cents(i64::MIN));

        let mut c = half;
        c += half;
        assert_eq!(c.cents(), i64::MAX);
        assert_eq!([half, half, half].iter().sum::<Money>().cents(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let prices = [
            Money::from_dollars(10),
            Money::from_dollars(15),
            Money::from_dollars(20),
        ];

        let owned: Money = prices.iter().copied().sum();
        let borrowed: Money = prices.iter().sum();

        assert_eq!(owned, Money::from_dollars(45));
        assert_eq!(borrowed, owned);
        assert_eq!(std::iter::empty::<Money>().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_percentage() {
        assert_eq!(Money::from_dollars(40).percentage(1000), Money::from_dollars(4));
        assert_eq!(Money::from_dollars(60).percentage(2000), Money::from_dollars(12));
        assert_eq!(Money::from_dollars(45).percentage(0), Money::zero());

        // $0.05 at 10% = 0.5 cent, rounds half-up
        assert_eq!(Money::from_cents(5).percentage(1000), Money::from_cents(1));
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(4050).to_decimal_string(), "40.50");
        assert_eq!(Money::zero().to_decimal_string(), "0.00");
    }
}
