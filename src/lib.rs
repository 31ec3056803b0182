//! # rusty_eurofx
//!
//! Historical foreign-exchange conversion against the ECB euro reference
//! rates.
//!
//! The crate keeps the full daily rate history in memory, refreshes it from
//! the published archive once per calendar day, and converts amounts between
//! any two quoted currencies as of a given date. Dates without a published
//! record (weekends, holidays) use the most recent earlier record.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use rusty_eurofx::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let converter = CurrencyConverter::default_instance()?;
//! let date = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
//!
//! let result = converter.convert(10, date, "USD", "EUR").await?;
//! println!("{} EUR (rates of {:?})", result.value, result.used_date);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod converter;
pub mod currency;
pub mod error;
pub mod feed;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::ConverterConfig;
    pub use crate::converter::{ConversionResult, CurrencyConverter, IntoAmount};
    pub use crate::currency::CurrencyCode;
    pub use crate::error::{FxError, Result};
    pub use crate::feed::{RateRecord, RateTable};
}
