//! # Money Module
//!
//! Parses, normalizes and formats the monetary values the storefront shows.
//!
//! ## Two Representations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DISPLAY VALUES (f64, always rounded to 2 decimals)                     │
//! │    inventory "£12.50" ──► parse_money ──► 12.5 ──► format_money         │
//! │                                                      "£ 12.50"          │
//! │                                                                         │
//! │  STORED VALUES (Money, integer cents)                                   │
//! │    12.5 ──► Money::from_decimal ──► 1250 cents ──► CartLineItem         │
//! │                                                                         │
//! │  Anything that gets summed or persisted goes through Money.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::{format_money_with, parse_money, Money};
//!
//! assert_eq!(parse_money("USD -3.456").unwrap(), -3.46);
//! assert_eq!(format_money_with(7.0, "$"), "$ 7.00");
//! assert_eq!(Money::from_decimal(12.5).cents(), 1250);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::UnitPrice;
use crate::validation::ValidationResult;

/// Symbol used when no currency is given or the code is unknown.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "£";

// =============================================================================
// Currency
// =============================================================================

/// Currencies the storefront knows a symbol for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Currency {
    #[default]
    Gbp,
    Eur,
    Usd,
}

impl Currency {
    /// Case-insensitive lookup; unknown codes fall back to GBP.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "EUR" => Currency::Eur,
            "USD" => Currency::Usd,
            _ => Currency::Gbp,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Gbp => "£",
            Currency::Eur => "€",
            Currency::Usd => "$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returns the display symbol for an ISO currency code.
///
/// ## Example
/// ```rust
/// use storefront_core::money::currency_symbol;
///
/// assert_eq!(currency_symbol("eur"), "€");
/// assert_eq!(currency_symbol("xyz"), "£");
/// ```
pub fn currency_symbol(code: &str) -> &'static str {
    Currency::from_code(code).symbol()
}

// =============================================================================
// Parsing & Formatting
// =============================================================================

/// Input accepted by [`parse_money`]: a money string or a plain number.
#[derive(Debug, Clone, PartialEq)]
pub enum MoneyInput {
    Text(String),
    Number(f64),
}

impl From<&str> for MoneyInput {
    fn from(s: &str) -> Self {
        MoneyInput::Text(s.to_string())
    }
}

impl From<String> for MoneyInput {
    fn from(s: String) -> Self {
        MoneyInput::Text(s)
    }
}

impl From<f64> for MoneyInput {
    fn from(n: f64) -> Self {
        MoneyInput::Number(n)
    }
}

impl From<i64> for MoneyInput {
    fn from(n: i64) -> Self {
        MoneyInput::Number(n as f64)
    }
}

impl From<i32> for MoneyInput {
    fn from(n: i32) -> Self {
        MoneyInput::Number(f64::from(n))
    }
}

/// Rounds to 2 decimal places, half away from zero.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a money string or number into a 2-decimal value.
///
/// ## Rules
/// - Strings: every character other than a digit, `.` or `-` is dropped
///   before parsing ("£1,299.99" → 1299.99). Nothing left means `0.0`.
/// - Numbers: rounded to 2 decimals.
/// - Non-finite or unparseable input is an `InvalidFormat` error.
pub fn parse_money(input: impl Into<MoneyInput>) -> ValidationResult<f64> {
    let value = match input.into() {
        MoneyInput::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            if cleaned.is_empty() {
                return Ok(0.0);
            }
            cleaned
                .parse::<f64>()
                .map_err(|_| invalid_money(format!("'{}' is not a number", text)))?
        }
        MoneyInput::Number(n) => n,
    };

    if !value.is_finite() {
        return Err(invalid_money("value is not finite".to_string()));
    }

    Ok(round2(value))
}

fn invalid_money(reason: String) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "money".to_string(),
        reason,
    }
}

/// Formats a value with the default `£` symbol: `"£ 12.50"`.
pub fn format_money(value: f64) -> String {
    format_money_with(value, DEFAULT_CURRENCY_SYMBOL)
}

/// Formats a value fixed to 2 decimals, prefixed by `symbol` and a space.
pub fn format_money_with(value: f64, symbol: &str) -> String {
    format!("{} {:.2}", symbol, round2(value))
}

/// Picks the price a shopper pays right now.
///
/// ## Rules
/// ```text
/// unit_price absent ─────────────► None
/// sale_value set ────────────────► sale value
/// otherwise ─────────────────────► retail value (None if missing)
/// ```
pub fn current_price(unit_price: Option<&UnitPrice>) -> Option<f64> {
    let unit_price = unit_price?;
    match unit_price.sale_value.as_ref().filter(|v| v.is_set()) {
        Some(sale) => sale.as_decimal(),
        None => unit_price.retail_value.as_ref()?.as_decimal(),
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (pence / cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds, discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a display value to cents: `round(value * 100)`.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(19.99).cents(), 1999);
    /// assert_eq!(Money::from_decimal(-5.5).cents(), -550);
    /// ```
    pub fn from_decimal(value: f64) -> Self {
        Money((value * 100.0).round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a 2-decimal display number.
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats with an explicit currency.
    pub fn format(&self, currency: Currency) -> String {
        format_money_with(self.to_decimal(), currency.symbol())
    }
}

/// Display uses the default currency: `"£ 10.99"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(self.to_decimal()))
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
