//! Amount validation

use crate::error::{FxError, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Smallest non-zero magnitude a `Decimal` can hold (28 fractional digits)
const MIN_AMOUNT_MAGNITUDE: f64 = 1e-28;

/// Values accepted as a conversion amount
///
/// Anything that is not a finite number is rejected with `InvalidAmount`.
/// Supported amounts are zero or have a magnitude between `1e-28` and
/// `Decimal::MAX` (about `7.9e28`); finite values outside that range are
/// rejected as out of range rather than rounded to zero or clamped. Digits
/// beyond the 28th fractional place are rounded.
pub trait IntoAmount {
    fn into_amount(self) -> Result<Decimal>;
}

impl IntoAmount for Decimal {
    fn into_amount(self) -> Result<Decimal> {
        Ok(self)
    }
}

impl IntoAmount for &str {
    fn into_amount(self) -> Result<Decimal> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return Err(FxError::InvalidAmount("value is empty".to_string()));
        }
        match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
            Ok(amount) if amount.is_zero() && has_nonzero_mantissa(trimmed) => {
                Err(out_of_range(trimmed))
            }
            Ok(amount) => Ok(amount),
            Err(_) if is_numeric_literal(trimmed) => Err(out_of_range(trimmed)),
            Err(_) => Err(FxError::InvalidAmount(format!("'{}' is not a number", self))),
        }
    }
}

impl IntoAmount for &String {
    fn into_amount(self) -> Result<Decimal> {
        self.as_str().into_amount()
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Result<Decimal> {
        self.as_str().into_amount()
    }
}

impl IntoAmount for f64 {
    fn into_amount(self) -> Result<Decimal> {
        if !self.is_finite() {
            return Err(FxError::InvalidAmount(format!("{} is not a finite number", self)));
        }
        if self != 0.0 && self.abs() < MIN_AMOUNT_MAGNITUDE {
            return Err(out_of_range(&format!("{:e}", self)));
        }
        Decimal::from_f64(self)
            .filter(|amount| !amount.is_zero() || self == 0.0)
            .ok_or_else(|| out_of_range(&format!("{:e}", self)))
    }
}

impl IntoAmount for i64 {
    fn into_amount(self) -> Result<Decimal> {
        Ok(Decimal::from(self))
    }
}

impl IntoAmount for i32 {
    fn into_amount(self) -> Result<Decimal> {
        Ok(Decimal::from(self))
    }
}

fn out_of_range(value: &str) -> FxError {
    FxError::InvalidAmount(format!(
        "{} is out of range (supported magnitude 1e-28 to {})",
        value,
        Decimal::MAX
    ))
}

/// Plain or scientific decimal notation, no `inf`/`NaN` spellings
fn is_numeric_literal(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        && s.parse::<f64>().is_ok()
}

fn has_nonzero_mantissa(s: &str) -> bool {
    s.split(['e', 'E'])
        .next()
        .is_some_and(|mantissa| mantissa.chars().any(|c| matches!(c, '1'..='9')))
}
