//! # Money Module
//!
//! Provides the `Money` and `TaxRate` types for handling monetary values.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:  4501 × 0.19 = 855.1899999999999                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer centavos, tax rate in basis points              │
//! │    450100 centavos × 1900 bps / 10000 = 85519 centavos ($855,19)       │
//! │    Tax is rounded half-up to the centavo, once, on the subtotal.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use frutipos_core::money::Money;
//!
//! let price = Money::from_pesos(1500);
//! let line = price.multiply_quantity(3);
//!
//! assert_eq!(line.cents(), 450_000);
//! assert_eq!(line.to_string(), "$4.500");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Centavos per peso.
const CENTS_PER_PESO: i64 = 100;

/// Basis points in 100%.
const BPS_SCALE: i128 = 10_000;

/// Largest unit price, unit cost or expense amount the catalog accepts
/// (ten billion pesos).
pub const MAX_UNIT_AMOUNT: Money = Money::from_pesos(10_000_000_000);

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest unit of the Colombian peso).
///
/// ## Design Decisions
/// - **i64 (signed)**: net profit can be negative
/// - **Transparent serde**: persisted as a plain JSON integer
///
/// ## Where Money is Used
/// ```text
/// Product.price_cents ──► CartItem line total ──► Cart subtotal ──► tax ──► Sale.total
/// Product.cost_cents  ──► CartItem snapshot   ──► COGS in reports
/// Expense.amount_cents ─────────────────────────► expenses in reports
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole pesos.
    ///
    /// ## Example
    /// ```rust
    /// use frutipos_core::money::Money;
    ///
    /// assert_eq!(Money::from_pesos(1500).cents(), 150_000);
    /// ```
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * CENTS_PER_PESO)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole peso portion (truncated toward zero).
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / CENTS_PER_PESO
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % CENTS_PER_PESO).abs()
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

    /// Calculates tax on this amount, rounding half-up to the centavo.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 is the half
    /// that makes the division round instead of truncate.
    ///
    /// ## Example
    /// ```rust
    /// use frutipos_core::money::{Money, TaxRate};
    ///
    /// let subtotal = Money::from_pesos(4500);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1900)); // 19% IVA
    /// assert_eq!(tax, Money::from_pesos(855));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large subtotals from overflowing during the multiply
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + BPS_SCALE / 2) / BPS_SCALE;
        Money::from_cents(tax_cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies by a quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Parses operator input written in pesos (`"1500"`, `"1500.50"`,
    /// `"1500,5"`). Returns `None` for anything that is not a finite number
    /// or does not fit in centavos.
    ///
    /// ## Example
    /// ```rust
    /// use frutipos_core::money::Money;
    ///
    /// assert_eq!(Money::parse_pesos("1500.5"), Some(Money::from_cents(150_050)));
    /// assert_eq!(Money::parse_pesos("abc"), None);
    /// ```
    pub fn parse_pesos(input: &str) -> Option<Money> {
        let normalized = input.trim().replace(',', ".");
        if normalized.is_empty() {
            return None;
        }

        let value: f64 = normalized.parse().ok()?;
        if !value.is_finite() {
            return None;
        }

        let cents = (value * CENTS_PER_PESO as f64).round();
        // 2^63 is exactly representable; anything at or past it would saturate
        if cents >= i64::MAX as f64 || cents < i64::MIN as f64 {
            return None;
        }

        Some(Money::from_cents(cents as i64))
    }

    /// Plain decimal representation in pesos, two decimals, no grouping.
    /// Used by machine-readable exports.
    ///
    /// ## Example
    /// ```rust
    /// use frutipos_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(535_500).to_decimal_string(), "5355.00");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.pesos().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the es-CO convention: `$` prefix, `.` as thousands
/// separator, `,` before centavos, centavos omitted when zero.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let grouped = group_thousands(self.pesos().unsigned_abs());

        if self.cents_part() == 0 {
            write!(f, "{}${}", sign, grouped)
        } else {
            write!(f, "{}${},{:02}", sign, grouped, self.cents_part())
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }

    out
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

/// Multiplication by a quantity.
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
// Tax Rate
// =============================================================================

/// Flat tax rate in basis points (1 bps = 0.01%).
///
/// The store configuration persists the rate as a decimal fraction
/// (`0.19`); it is converted to basis points once, at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a decimal fraction (`0.19` = 19%).
    /// Negative or non-finite input yields zero.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() || fraction <= 0.0 {
            return TaxRate::zero();
        }
        TaxRate((fraction * BPS_SCALE as f64).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a decimal fraction.
    #[inline]
    pub fn as_fraction(&self) -> f64 {
        self.0 as f64 / BPS_SCALE as f64
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
