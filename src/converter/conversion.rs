//! Conversion requests, results and arithmetic

use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use crate::feed::RateRecord;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fractional digits kept in conversion results
pub const RESULT_DECIMAL_PLACES: u32 = 2;

/// A validated conversion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl ConversionRequest {
    pub fn is_same_currency(&self) -> bool {
        self.from == self.to
    }
}

/// Converted value plus the inputs used to compute it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub value: Decimal,
    /// Date of the applied record; `None` when no record was needed
    pub used_date: Option<NaiveDate>,
    pub used_from_rate: Decimal,
    pub used_to_rate: Decimal,
}

impl ConversionResult {
    /// Result of a same-currency conversion: the amount, untouched
    pub fn unchanged(amount: Decimal) -> Self {
        Self {
            value: amount,
            used_date: None,
            used_from_rate: Decimal::ONE,
            used_to_rate: Decimal::ONE,
        }
    }
}

/// Round half away from zero to two decimal places
pub fn round_value(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RESULT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Apply a resolved record to a request
///
/// `value = round(amount / from_rate * to_rate, 2)`, where the base currency
/// has a rate of 1.
pub fn convert_with_record(
    record: &RateRecord,
    request: &ConversionRequest,
    base: &CurrencyCode,
) -> Result<ConversionResult> {
    if request.is_same_currency() {
        return Ok(ConversionResult::unchanged(request.amount));
    }

    let from_rate = rate_for(record, &request.from, base)?;
    let to_rate = rate_for(record, &request.to, base)?;

    let value = request
        .amount
        .checked_div(from_rate)
        .and_then(|v| v.checked_mul(to_rate))
        .ok_or_else(|| {
            FxError::InvalidAmount(format!(
                "{} {} is out of range for conversion to {}",
                request.amount, request.from, request.to
            ))
        })?;

    Ok(ConversionResult {
        value: round_value(value),
        used_date: Some(record.date()),
        used_from_rate: from_rate,
        used_to_rate: to_rate,
    })
}

fn rate_for(record: &RateRecord, code: &CurrencyCode, base: &CurrencyCode) -> Result<Decimal> {
    if code == base {
        return Ok(Decimal::ONE);
    }
    record.rate(code).ok_or_else(|| {
        FxError::UnknownCurrency(format!(
            "{} has no rate on {}",
            code,
            record.date_key()
        ))
    })
}
