//! # Money Module
//!
//! Provides the `Money` type for Pacific franc (XPF / CFP) amounts and the
//! denomination rounding applied to every amount shown or exported.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    12000 × 2 × (1 − 0.1) × 0.11 = 2376.0000000000005  ❌                │
//! │                                                                         │
//! │  CFP has no subdivision, but intermediate line values do:               │
//! │    3 × 1 333 F at 12.5% discount = 3 499.125 F                          │
//! │                                                                         │
//! │  OUR SOLUTION: 96-bit decimal francs                                    │
//! │    Exact arithmetic through the whole invoice, ONE rounding step        │
//! │    at presentation time (round_to_denomination)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use facturexl_core::money::{round_to_denomination, Money};
//! use rust_decimal::Decimal;
//!
//! let price = Money::from_francs(12_000);
//! let line = price.multiply_quantity(2);
//! assert_eq!(line, Money::from_francs(24_000));
//!
//! // Nearest 5 F, after rounding to the franc
//! assert_eq!(round_to_denomination(Decimal::new(23_976, 0)), 23_975);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use ts_rs::TS;

use crate::types::Percent;

/// ISO 4217 code of the Pacific franc.
pub const CURRENCY_CODE: &str = "XPF";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in francs, exact until it is rounded for display.
///
/// ## Design Decisions
/// - **Decimal (signed)**: credit notes and discounts may go negative
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **No `From<f64>`**: amounts come in as decimals or whole francs
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price ──► subtotal ──► after discount ──► line total     │
/// │                                             │                           │
/// │                                             ▼                           │
/// │                     TotalsResult (Σ, full precision)                    │
/// │                                             │                           │
/// │                                             ▼                           │
/// │              round_to_denomination ──► PDF / dashboard / DBF export     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps a decimal amount of francs.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from whole francs.
    ///
    /// ## Example
    /// ```rust
    /// use facturexl_core::money::Money;
    ///
    /// let price = Money::from_francs(1_500);
    /// assert_eq!(price.round_to_denomination(), 1_500);
    /// ```
    #[inline]
    pub fn from_francs(francs: i64) -> Self {
        Money(Decimal::from(francs))
    }

    /// Returns the exact (unrounded) amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use facturexl_core::money::Money;
    ///
    /// let unit_price = Money::from_francs(12_000);
    /// assert_eq!(unit_price.multiply_quantity(2), Money::from_francs(24_000));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Returns `rate` percent of this amount, unrounded.
    ///
    /// Used for both the discount and the tax step of a line:
    /// `24 000 × 10% = 2 400`, `21 600 × 11% = 2 376`.
    #[inline]
    pub fn percentage(&self, rate: Percent) -> Money {
        Money(self.0 * rate.fraction())
    }

    /// Rounds to the franc, then to the nearest 5 F.
    ///
    /// See [`round_to_denomination`].
    #[inline]
    pub fn round_to_denomination(&self) -> i64 {
        round_to_denomination(self.0)
    }
}

// =============================================================================
// Denomination Rounding
// =============================================================================

/// Rounds an amount to the smallest CFP denomination in circulation (5 F).
///
/// ## Algorithm
/// ```text
/// r = amount rounded to the franc (half away from zero)
/// d = |r| mod 10
///
///   d = 0, 5  →  r
///   d = 1, 2  →  down to the 0 below    (12 → 10)
///   d = 3, 4  →  up to the 5 above      (13 → 15)
///   d = 6, 7  →  down to the 5 below    (17 → 15)
///   d = 8, 9  →  up to the next 0       (18 → 20)
/// ```
///
/// Negative amounts are rounded on their magnitude and the sign restored,
/// so `round(-x) == -round(x)` and a credit note mirrors its invoice.
///
/// This is a one-way presentation transform. Never feed its output back into
/// line arithmetic.
///
/// ## Example
/// ```rust
/// use facturexl_core::money::round_to_denomination;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_denomination(Decimal::from(102)), 100);
/// assert_eq!(round_to_denomination(Decimal::new(1275, 1)), 130); // 127.5 → 128 → 130
/// assert_eq!(round_to_denomination(Decimal::from(-13)), -15);
/// ```
pub fn round_to_denomination(amount: Decimal) -> i64 {
    let francs = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    // A Decimal mantissa is 96 bits, so the integral part always fits i128.
    let francs = francs.to_i128().unwrap_or_default();
    let snapped = snap_to_five(francs);
    snapped.clamp(i128::from(MIN_DENOMINATED), i128::from(MAX_DENOMINATED)) as i64
}

/// Largest multiple of 5 representable as `i64`.
pub const MAX_DENOMINATED: i64 = i64::MAX - 2;

/// Smallest multiple of 5 representable as `i64`; mirrors [`MAX_DENOMINATED`].
pub const MIN_DENOMINATED: i64 = i64::MIN + 3;

fn snap_to_five(francs: i128) -> i128 {
    let magnitude = francs.abs();
    let snapped = match magnitude % 10 {
        d @ (1 | 2) => magnitude - d,
        d @ (3 | 4) => magnitude + (5 - d),
        d @ (6 | 7) => magnitude - (d - 5),
        d @ (8 | 9) => magnitude + (10 - d),
        _ => magnitude,
    };
    if francs < 0 {
        -snapped
    } else {
        snapped
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the exact amount with the currency code, e.g. `3499.125 XPF`.
///
/// ## Note
/// This is for logs and debugging. Invoices display the rounded value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0.normalize(), CURRENCY_CODE)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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
