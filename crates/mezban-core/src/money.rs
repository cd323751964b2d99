//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    Every stored amount is a whole number of the smallest            │
//! │    currency unit. The ledger invariant                              │
//! │    total == Σ line subtotals holds EXACTLY, not within epsilon.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mezban_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(200); // 2.00
//!
//! // Extend by a sold quantity (3 × 2.00 = 6.00)
//! let subtotal = price.extend(3.0);
//! assert_eq!(subtotal.cents(), 600);
//!
//! // Render for a receipt
//! assert_eq!(subtotal.with_currency("PKR"), "PKR 6.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: room for refunds and corrections
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Currency-agnostic**: the currency tag travels separately on the
///   Sale/Settings records; `Money` is only the magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use mezban_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Extends a unit price by a sold quantity, rounding half-up to a cent.
    ///
    /// Quantities are constrained to half-unit steps (see
    /// [`crate::validation::validate_quantity`]), so the product
    /// `cents × quantity` is always a whole number of half-cents. The
    /// math runs on that half-cent grid in integers; the only rounding
    /// ever needed is the final half-cent, resolved upward.
    ///
    /// ## Example
    /// ```rust
    /// use mezban_core::money::Money;
    ///
    /// // 0.99 × 0.5 kg = 0.495 → 0.50
    /// assert_eq!(Money::from_cents(99).extend(0.5).cents(), 50);
    /// // 2.00 × 3 = 6.00 exactly
    /// assert_eq!(Money::from_cents(200).extend(3.0).cents(), 600);
    /// ```
    pub fn extend(&self, quantity: f64) -> Money {
        // Quantity on the half-unit grid: 3.0 → 6 halves, 0.5 → 1 half.
        // i128 keeps the intermediate product from overflowing.
        let halves = (quantity * 2.0).round() as i128;
        let half_cents = self.0 as i128 * halves;
        let cents = (half_cents + 1).div_euclid(2);
        Money(cents as i64)
    }

    /// Renders the amount with two decimals and no currency tag.
    ///
    /// ## Example
    /// ```rust
    /// use mezban_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(600).fixed(), "6.00");
    /// ```
    pub fn fixed(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }

    /// Renders the amount the way receipts and reports show it:
    /// `currency_code + " " + fixed(2 decimals)`.
    ///
    /// ## Example
    /// ```rust
    /// use mezban_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(600).with_currency("PKR"), "PKR 6.00");
    /// ```
    pub fn with_currency(&self, currency: &str) -> String {
        format!("{} {}", currency, self.fixed())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// This is for debugging and logs. Receipts go through
/// [`Money::with_currency`] so the store's currency tag is attached.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fixed())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summing an iterator of Money values (line subtotals → sale total).
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
