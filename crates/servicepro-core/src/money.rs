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
//! │  The shop trades in Vietnamese đồng, which has no minor unit.           │
//! │  Every amount is a whole number of đồng held in an i64:                 │
//! │    500.000 ₫  →  Money(500_000)                                         │
//! │                                                                         │
//! │  Only tax introduces fractions, and it is rounded once, explicitly.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use servicepro_core::money::Money;
//!
//! let price = Money::from_dong(150_000);
//! let line = price * 2;
//! assert_eq!(line.dong(), 300_000);
//! assert_eq!(line.to_string(), "300.000 ₫");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole đồng.
///
/// ## Design Decisions
/// - **i64 (signed)**: debt deltas are negative when a payment lands
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: serialises as a bare number, the shape the
///   front end already stores in `totalAmount` / `paidAmount`
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► InvoiceItem.price ──► Invoice.total_amount           │
/// │                                                 │                       │
/// │                      Invoice.paid_amount ───────┤                       │
/// │                                                 ▼                       │
/// │                              ledger::outstanding(total, paid)           │
/// │                                                 │                       │
/// │                                                 ▼                       │
/// │                              Customer.balance / Supplier.balance        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole đồng.
    ///
    /// ## Example
    /// ```rust
    /// use servicepro_core::money::Money;
    ///
    /// let fee = Money::from_dong(100_000);
    /// assert_eq!(fee.dong(), 100_000);
    /// ```
    #[inline]
    pub const fn from_dong(dong: i64) -> Self {
        Money(dong)
    }

    /// Returns the value in đồng.
    #[inline]
    pub const fn dong(&self) -> i64 {
        self.0
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

    /// Floors the value at zero.
    ///
    /// The ledger never carries a negative outstanding amount, so every
    /// balance and every per-record debt passes through here.
    ///
    /// ```rust
    /// use servicepro_core::money::Money;
    ///
    /// assert_eq!(Money::from_dong(-5).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_dong(5).clamp_non_negative().dong(), 5);
    /// ```
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        Money(self.0.max(0))
    }

    /// Calculates tax with half-up rounding.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount * bps + 5000) / 10000`.
    /// The +5000 rounds half up, which matches how invoice forms round
    /// non-negative amounts.
    ///
    /// ## Example
    /// ```rust
    /// use servicepro_core::money::Money;
    /// use servicepro_core::types::TaxRate;
    ///
    /// let before_tax = Money::from_dong(1_234_567);
    /// let tax = before_tax.calculate_tax(TaxRate::from_percent(8));
    /// // 1.234.567 × 8% = 98.765,36 → 98.765
    /// assert_eq!(tax.dong(), 98_765);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large VND amounts × bps from overflowing
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_dong(tax as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Vietnamese display: dot-grouped thousands, trailing `₫`.
///
/// ## Note
/// For logs and receipts. Locale-aware formatting stays in the front end.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{} ₫", sign, grouped)
    }
}

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

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
