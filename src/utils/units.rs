//! Conversion between human-facing token amounts and stored base units

use bigdecimal::{BigDecimal, Signed, ToPrimitive, Zero};
use std::str::FromStr;

use crate::types::*;

/// Decimal digits in `u128::MAX`
const MAX_AMOUNT_DIGITS: i64 = 39;

/// Parse a display amount such as `"12.5"` into base units for `decimals`
///
/// Rejects negative values, more fractional digits than `decimals` allows, and
/// results that do not fit an [`Amount`].
pub fn parse_units(input: &str, decimals: u8) -> LedgerResult<Amount> {
    let value = BigDecimal::from_str(input.trim())
        .map_err(|e| LedgerError::Validation(format!("Invalid amount '{}': {}", input, e)))?;

    if value.is_negative() {
        return Err(LedgerError::Validation(format!(
            "Amount cannot be negative: {}",
            input
        )));
    }

    if value.is_zero() {
        return Ok(0);
    }

    let (digits, exponent) = value.normalized().as_bigint_and_exponent();
    let decimals = i64::from(decimals);
    if exponent > decimals {
        return Err(LedgerError::Validation(format!(
            "Amount '{}' has more than {} fractional digits",
            input, decimals
        )));
    }

    // digits * 10^shift has at least `len(digits) + shift` decimal digits
    let shift = decimals.saturating_sub(exponent);
    let significant = digits.to_string().len() as i64;
    if significant.saturating_add(shift) > MAX_AMOUNT_DIGITS {
        return Err(LedgerError::Overflow("base units of a display amount"));
    }

    let (base_units, _) = BigDecimal::new(digits, -shift)
        .with_scale(0)
        .as_bigint_and_exponent();

    base_units
        .to_u128()
        .ok_or(LedgerError::Overflow("base units of a display amount"))
}

/// Format base units as a display amount with exactly `decimals` fractional digits
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    format!("{}.{}", whole, fraction)
}

/// How a command-line amount should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountScale {
    /// The value is already in base units and must be an integer
    Base,
    /// The value is in display units for the given number of decimals
    Display(u8),
}

impl AmountScale {
    /// Resolve `input` into base units
    pub fn resolve(&self, input: &str) -> LedgerResult<Amount> {
        match self {
            AmountScale::Base => parse_units(input, 0),
            AmountScale::Display(decimals) => parse_units(input, *decimals),
        }
    }
}
