//! Nearest-prior-date lookup
//!
//! Resolves the record that applies to a requested date: the record published
//! on that date, or failing that the most recent record published before it.
//! Weekends and holidays fall out of the calendar ordering, no weekday logic
//! is involved.

use super::table::{date_key, RateRecord, RateTable};
use crate::error::{FxError, Result};
use chrono::NaiveDate;

/// Outcome of the binary search over a newest-first table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// A record exists for the exact date
    Exact(usize),
    /// No exact record; position of the nearest older record.
    /// Equal to the table length when the date precedes every record.
    Before(usize),
}

impl Probe {
    pub fn position(self) -> usize {
        match self {
            Probe::Exact(pos) | Probe::Before(pos) => pos,
        }
    }
}

/// Binary search for the greatest date <= `date`
///
/// Records are sorted descending, so newer records compare as "less" than the
/// target and the insertion point lands on the first record older than it.
pub fn search(table: &RateTable, date: NaiveDate) -> Probe {
    match table.records().binary_search_by(|record| date.cmp(&record.date())) {
        Ok(pos) => Probe::Exact(pos),
        Err(pos) => Probe::Before(pos),
    }
}

/// Resolve the record applicable to `date`
///
/// Tables built with the exact-date index are probed there first; a miss
/// falls back to the binary search.
pub fn resolve(table: &RateTable, date: NaiveDate) -> Result<&RateRecord> {
    if table.has_exact_date_index() {
        if let Some(record) = table.record_for_exact_date(&date_key(date)) {
            return Ok(record);
        }
    }

    table
        .record_at(search(table, date).position())
        .ok_or(FxError::NoDataForDate(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::loader::FeedLoader;

    const FEED: &str = "Date,USD\n\
                        2016-09-05,1.1146\n\
                        2016-09-02,1.1167\n\
                        2016-01-04,1.0898\n\
                        2015-12-31,1.0887\n";

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tables() -> [RateTable; 2] {
        [
            FeedLoader::new(false).parse(FEED).unwrap(),
            FeedLoader::new(true).parse(FEED).unwrap(),
        ]
    }

    #[test]
    fn test_search_positions() {
        let [table, _] = tables();
        assert_eq!(search(&table, ymd(2016, 9, 5)), Probe::Exact(0));
        assert_eq!(search(&table, ymd(2016, 9, 7)), Probe::Before(0));
        assert_eq!(search(&table, ymd(2016, 9, 3)), Probe::Before(1));
        assert_eq!(search(&table, ymd(2015, 12, 31)), Probe::Exact(3));
        assert_eq!(search(&table, ymd(2015, 12, 30)), Probe::Before(4));
    }

    #[test]
    fn test_weekend_and_holiday_round_down() {
        for table in tables() {
            // Saturday and Sunday -> Friday
            assert_eq!(resolve(&table, ymd(2016, 9, 3)).unwrap().date_key(), "2016-09-02");
            assert_eq!(resolve(&table, ymd(2016, 9, 4)).unwrap().date_key(), "2016-09-02");
            // Monday exact
            assert_eq!(resolve(&table, ymd(2016, 9, 5)).unwrap().date_key(), "2016-09-05");
            // New Year's Day -> previous year's last business day
            assert_eq!(resolve(&table, ymd(2016, 1, 1)).unwrap().date_key(), "2015-12-31");
            // After the newest record -> newest record
            assert_eq!(resolve(&table, ymd(2017, 1, 1)).unwrap().date_key(), "2016-09-05");
        }
    }

    #[test]
    fn test_before_earliest_record() {
        for table in tables() {
            assert!(matches!(
                resolve(&table, ymd(2015, 12, 30)),
                Err(FxError::NoDataForDate(d)) if d == ymd(2015, 12, 30)
            ));
        }
    }

    #[test]
    fn test_empty_table() {
        let table = RateTable::empty();
        assert_eq!(search(&table, ymd(2016, 9, 5)), Probe::Before(0));
        assert!(resolve(&table, ymd(2016, 9, 5)).is_err());
    }
}
