//! Error types for rusty_eurofx

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for rate table maintenance and conversions
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Feed download failed: {0}")]
    FeedDownload(String),

    #[error("Feed extraction failed: {0}")]
    FeedExtraction(String),

    #[error("Feed read failed: {0}")]
    FeedRead(String),

    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    #[error("Could not find currency data for date {0}")]
    NoDataForDate(NaiveDate),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Conversion queue is closed")]
    QueueClosed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for rusty_eurofx operations
pub type Result<T> = std::result::Result<T, FxError>;
