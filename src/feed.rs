//! Rate feed handling
//!
//! # Components
//!
//! - **table**: immutable newest-first rate table with optional date index
//! - **loader**: parses feed text into a table
//! - **lookup**: exact / nearest-prior-date resolution
//! - **refresher**: staleness check and download -> extract -> reload cycle
//! - **sources**: download, extraction and filesystem collaborators

pub mod loader;
pub mod lookup;
pub mod refresher;
pub mod sources;
pub mod table;

pub use loader::FeedLoader;
pub use lookup::{resolve, search, Probe};
pub use refresher::{Clock, FeedRefresher, FreshnessState, SystemClock};
pub use sources::{
    ArchiveExtractor, FeedDownloader, FeedStore, HttpFeedDownloader, LocalFeedStore,
    ZipArchiveExtractor,
};
pub use table::{date_key, RateRecord, RateTable};
