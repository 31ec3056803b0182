//! Feed loader: delimited text -> RateTable
//!
//! Expected layout (ECB `eurofxref-hist.csv`):
//!
//! ```text
//! Date,USD,JPY,SEK,
//! 2016-09-05,1.1146,114.88,9.5183,
//! 2016-09-02,1.1167,115.51,9.5510,
//! ```
//!
//! The first header cell labels the date column and is ignored. Rows are
//! published newest-first; a feed in any other order is sorted before the
//! table is built.

use super::table::{RateRecord, RateTable, DATE_KEY_FORMAT};
use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use hashbrown::{HashMap, HashSet};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Cell value the ECB uses for currencies not quoted on a date
const NOT_AVAILABLE: &str = "N/A";

/// Parses raw feed text into a rate table
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedLoader {
    exact_date_index: bool,
}

impl FeedLoader {
    pub fn new(exact_date_index: bool) -> Self {
        Self { exact_date_index }
    }

    /// Parse the feed text
    pub fn parse(&self, raw: &str) -> Result<RateTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(raw.as_bytes());
        let mut rows = reader.records();

        let header = rows
            .next()
            .ok_or_else(|| FxError::MalformedFeed("Missing header row".to_string()))?
            .map_err(|e| FxError::MalformedFeed(format!("Failed to read header: {}", e)))?;
        let columns = Self::currency_columns(&header)?;

        let mut records = Vec::new();
        for (n, row) in rows.enumerate() {
            let line = n + 2;
            let row = row
                .map_err(|e| FxError::MalformedFeed(format!("Failed to read line {}: {}", line, e)))?;

            if row.iter().all(str::is_empty) {
                continue;
            }

            if row.len() != header.len() {
                return Err(FxError::MalformedFeed(format!(
                    "Line {}: expected {} fields, got {}",
                    line,
                    header.len(),
                    row.len()
                )));
            }

            records.push(Self::parse_row(&columns, &row, line)?);
        }

        if !records.windows(2).all(|w| w[0].date() > w[1].date()) {
            log::warn!(
                "Feed rows are not newest-first, sorting {} records",
                records.len()
            );
            records.sort_by(|a, b| b.date().cmp(&a.date()));
        }

        let table = RateTable::new(records, self.exact_date_index)?;
        log::info!(
            "Loaded {} rate records ({:?} to {:?})",
            table.record_count(),
            table.earliest_date(),
            table.latest_date()
        );
        Ok(table)
    }

    /// Currency code per rate column; `None` for blank trailing header cells
    fn currency_columns(header: &StringRecord) -> Result<Vec<Option<CurrencyCode>>> {
        let columns = header
            .iter()
            .skip(1)
            .map(|cell| {
                if cell.is_empty() {
                    Ok(None)
                } else {
                    CurrencyCode::parse(cell).map(Some).map_err(|_| {
                        FxError::MalformedFeed(format!("Invalid currency code in header: '{}'", cell))
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        {
            let mut seen = HashSet::with_capacity(columns.len());
            if let Some(dup) = columns.iter().flatten().find(|code| !seen.insert(*code)) {
                return Err(FxError::MalformedFeed(format!(
                    "Duplicate currency column in header: {}",
                    dup
                )));
            }
        }

        if columns.iter().all(Option::is_none) {
            return Err(FxError::MalformedFeed(
                "Header row has no currency columns".to_string(),
            ));
        }
        Ok(columns)
    }

    fn parse_row(columns: &[Option<CurrencyCode>], row: &StringRecord, line: usize) -> Result<RateRecord> {
        let date_str = &row[0];
        let date = NaiveDate::parse_from_str(date_str, DATE_KEY_FORMAT).map_err(|_| {
            FxError::MalformedFeed(format!("Line {}: invalid date '{}'", line, date_str))
        })?;

        let mut rates = HashMap::with_capacity(columns.len());
        for (code, cell) in columns.iter().zip(row.iter().skip(1)) {
            let Some(code) = code else { continue };
            if let Some(rate) = Self::parse_rate(cell, code, line)? {
                rates.insert(code.clone(), rate);
            }
        }

        Ok(RateRecord::new(date, rates))
    }

    fn parse_rate(cell: &str, code: &CurrencyCode, line: usize) -> Result<Option<Decimal>> {
        if cell.is_empty() || cell.eq_ignore_ascii_case(NOT_AVAILABLE) {
            return Ok(None);
        }

        let rate = Decimal::from_str(cell)
            .or_else(|_| Decimal::from_scientific(cell))
            .map_err(|_| {
                FxError::MalformedFeed(format!("Line {}: invalid {} rate '{}'", line, code, cell))
            })?;

        if rate <= Decimal::ZERO {
            return Err(FxError::MalformedFeed(format!(
                "Line {}: {} rate must be positive, got {}",
                line, code, rate
            )));
        }
        Ok(Some(rate))
    }
}
