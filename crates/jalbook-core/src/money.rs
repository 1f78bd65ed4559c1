//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Balances drift one paisa at a time until the books no longer close.   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Rupees                                           │
//! │    Water supply is billed in whole rupees. A charge is rounded ONCE,   │
//! │    at calculation time, and every balance after that is exact i64      │
//! │    arithmetic.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use jalbook_core::money::Money;
//!
//! let charge = Money::from_rupees(500);
//! let total = charge + Money::from_rupees(300); // ₹800
//!
//! // Outstanding balances never go below zero:
//! let pending = Money::from_rupees(100).deduct_clamped(Money::from_rupees(400));
//! assert!(pending.is_zero());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole rupees (INR).
///
/// Signed on purpose: intermediate arithmetic may dip negative before the
/// clamp, and a correction can legitimately be negative. Serializes as a
/// bare integer.
///
/// Every monetary value in the system flows through this type: hourly rates,
/// session charges, cumulative payments, outstanding balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use jalbook_core::money::Money;
    ///
    /// let rate = Money::from_rupees(200);
    /// assert_eq!(rate.rupees(), 200);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees)
    }

    /// Returns the value in whole rupees.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0
    }

    /// The zero value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// True when the value is exactly zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True when the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// True when the value is below zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Subtracts `other`, clamping the result at zero.
    ///
    /// This is the balance rule for outstanding amounts: a payment larger
    /// than what is owed settles the balance and the excess is absorbed,
    /// it never produces a negative balance.
    ///
    /// ## Example
    /// ```rust
    /// use jalbook_core::money::Money;
    ///
    /// let pending = Money::from_rupees(300);
    /// assert_eq!(pending.deduct_clamped(Money::from_rupees(100)).rupees(), 200);
    /// assert_eq!(pending.deduct_clamped(Money::from_rupees(999)).rupees(), 0);
    /// ```
    #[inline]
    pub const fn deduct_clamped(&self, other: Money) -> Money {
        let result = self.0 - other.0;
        if result < 0 {
            Money(0)
        } else {
            Money(result)
        }
    }

    /// Multiplies a rate by a fractional duration in hours, rounding to the
    /// nearest whole rupee.
    ///
    /// This is the only place fractional arithmetic touches money, and the
    /// result is rounded exactly once.
    ///
    /// ## Example
    /// ```rust
    /// use jalbook_core::money::Money;
    ///
    /// let rate = Money::from_rupees(200); // per hour
    /// assert_eq!(rate.for_hours(2.5).rupees(), 500);
    /// assert_eq!(rate.for_hours(1.501).rupees(), 300);
    /// ```
    pub fn for_hours(&self, hours: f64) -> Money {
        Money((self.0 as f64 * hours).round() as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable rupee formatting.
///
/// ## Note
/// This is for logs and debugging. A UI layer should format for locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}", sign, self.0.abs())
    }
}

/// Defaults to zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Sum of two amounts.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// In-place addition.
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Difference of two amounts. May go negative; balances that must not
/// are deducted through [`Money::deduct_clamped`] instead.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// In-place subtraction.
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
