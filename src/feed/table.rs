//! Immutable per-date rate table
//!
//! Records are kept newest-first. The optional exact-date index maps the
//! `YYYY-MM-DD` key of every record to its position in the same vector, so
//! both representations always describe the same records.

use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use chrono::NaiveDate;
use hashbrown::HashMap;
use rust_decimal::Decimal;

/// Date key format used by the feed and the exact-date index
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Rates published for one date, relative to the base currency
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    date: NaiveDate,
    /// Units of currency per 1 unit of base currency
    rates: HashMap<CurrencyCode, Decimal>,
}

impl RateRecord {
    pub fn new(date: NaiveDate, rates: HashMap<CurrencyCode, Decimal>) -> Self {
        Self { date, rates }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Sortable `YYYY-MM-DD` key
    pub fn date_key(&self) -> String {
        date_key(self.date)
    }

    /// Rate for a quoted currency; the base currency is never quoted
    pub fn rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn rates(&self) -> &HashMap<CurrencyCode, Decimal> {
        &self.rates
    }
}

/// Format a date as a table key
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

#[derive(Debug, Clone, Default)]
enum DateIndex {
    #[default]
    Disabled,
    ByDate(HashMap<String, usize>),
}

/// Ordered collection of rate records, most recent first
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    records: Vec<RateRecord>,
    index: DateIndex,
}

impl RateTable {
    /// Create an empty table
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from records already sorted newest-first
    ///
    /// Fails if dates are not strictly descending, which also rules out
    /// duplicates.
    pub fn new(records: Vec<RateRecord>, exact_date_index: bool) -> Result<Self> {
        if let Some(pair) = records.windows(2).find(|w| w[0].date <= w[1].date) {
            return Err(FxError::MalformedFeed(format!(
                "Records must be strictly descending by date: {} followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        let index = if exact_date_index {
            DateIndex::ByDate(
                records
                    .iter()
                    .enumerate()
                    .map(|(pos, record)| (record.date_key(), pos))
                    .collect(),
            )
        } else {
            DateIndex::Disabled
        };

        Ok(Self { records, index })
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record_at(&self, index: usize) -> Option<&RateRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[RateRecord] {
        &self.records
    }

    pub fn has_exact_date_index(&self) -> bool {
        matches!(self.index, DateIndex::ByDate(_))
    }

    /// Exact lookup through the date index
    ///
    /// Always `None` when the table was built without the index.
    pub fn record_for_exact_date(&self, key: &str) -> Option<&RateRecord> {
        match &self.index {
            DateIndex::ByDate(by_date) => by_date.get(key).map(|&pos| &self.records[pos]),
            DateIndex::Disabled => None,
        }
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Currencies quoted in the most recent record
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self
            .records
            .first()
            .map(|r| r.rates.keys().cloned().collect())
            .unwrap_or_default();
        codes.sort();
        codes
    }
}
