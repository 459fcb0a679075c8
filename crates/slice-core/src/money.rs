//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Promotion math is multiplication and percentage subtraction all       │
//! │  day long; floats would leak error into every total.                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    $22.00 − 10% = 2200 − 220 = 1980 cents, exactly                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use slice_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1200); // $12.00
//!
//! // Arithmetic operations
//! let line = price.multiply_quantity(2);           // $24.00
//! let total = line + Money::from_cents(2200);      // $46.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: leaves room for refunds/credits even though catalog
///   prices are validated non-negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for the frontend JSON contract
///
/// Every monetary value in the engine flows through this type: catalog unit
/// prices, per-line amounts, and order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::money::Money;
    ///
    /// let price = Money::from_cents(1200); // Represents $12.00
    /// assert_eq!(price.cents(), 1200);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50.
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

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1200); // $12.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 2400); // $24.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a whole-number percentage discount and returns the reduced
    /// amount.
    ///
    /// ## Arguments
    /// * `percent` - Discount percentage, 0 to 100
    ///
    /// ## Implementation
    /// Integer math with half-up rounding on the discount amount:
    /// `discount = (cents × percent + 50) / 100`
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::money::Money;
    ///
    /// let line = Money::from_cents(2200);               // $22.00
    /// let discounted = line.apply_percent_discount(10); // 10% off
    /// assert_eq!(discounted.cents(), 1980);             // $19.80
    /// ```
    pub fn apply_percent_discount(&self, percent: u32) -> Money {
        // i128 guards against overflow on large amounts
        let discount = (self.0 as i128 * percent as i128 + 50) / 100;
        Money::from_cents(self.0 - discount as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// This is for debugging and logs. The frontend formats for display to
/// handle localization properly.
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

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line amounts (used by the order aggregator).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
