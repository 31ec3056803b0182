//! Staleness check and refresh of the rate table
//!
//! The refresher owns the current table. It is driven by the conversion
//! worker only, one call at a time, so it carries no locking of its own.
//!
//! A table is stale once the feed file on disk was last written on an
//! earlier calendar day (local time) than the check. A stale or missing file
//! triggers download -> extract -> reload; a fresh file with an empty table
//! (first request of the process) is only reloaded. Once a day has been
//! verified, further checks that day touch nothing.
//!
//! The freshness state is published on a watch channel, so other threads
//! can observe a refresh in progress through [`FeedRefresher::subscribe`].

use super::loader::FeedLoader;
use super::sources::{ArchiveExtractor, FeedDownloader, FeedStore};
use super::table::RateTable;
use crate::config::ConverterConfig;
use crate::error::Result;
use chrono::{DateTime, Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Source of the current time for staleness checks
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock in the process timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessState {
    /// Never verified, or the last check failed
    Stale,
    /// Download, extraction or reload in progress
    Refreshing,
    /// Table verified against the feed file on this day
    Fresh { verified_on: NaiveDate },
}

/// Keeps the rate table in sync with the remote feed
pub struct FeedRefresher<D, X, S> {
    feed_url: String,
    storage_dir: PathBuf,
    archive_path: PathBuf,
    feed_path: PathBuf,
    feed_entry: String,
    downloader: D,
    extractor: X,
    store: S,
    loader: FeedLoader,
    table: Arc<RateTable>,
    state: watch::Sender<FreshnessState>,
    refresh_count: u64,
    reload_count: u64,
}

impl<D, X, S> FeedRefresher<D, X, S>
where
    D: FeedDownloader,
    X: ArchiveExtractor,
    S: FeedStore,
{
    /// Create a refresher with an empty table
    pub fn new(config: &ConverterConfig, downloader: D, extractor: X, store: S) -> Self {
        Self {
            feed_url: config.feed_url.clone(),
            storage_dir: config.storage_dir.clone(),
            archive_path: config.archive_path(),
            feed_path: config.feed_path(),
            feed_entry: config.feed_file_name.clone(),
            downloader,
            extractor,
            store,
            loader: FeedLoader::new(config.enable_exact_date_index),
            table: Arc::new(RateTable::empty()),
            state: watch::Sender::new(FreshnessState::Stale),
            refresh_count: 0,
            reload_count: 0,
        }
    }

    /// Current table snapshot
    pub fn table(&self) -> &Arc<RateTable> {
        &self.table
    }

    pub fn state(&self) -> FreshnessState {
        *self.state.borrow()
    }

    /// Receiver that tracks every state transition
    pub fn subscribe(&self) -> watch::Receiver<FreshnessState> {
        self.state.subscribe()
    }

    /// Completed download -> extract -> reload cycles
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    /// Successful parses of the feed file
    pub fn reload_count(&self) -> u64 {
        self.reload_count
    }

    /// Make sure the table reflects the feed as of `as_of`'s calendar day
    ///
    /// On failure the current table is kept and the next call retries.
    pub async fn ensure_fresh(&mut self, as_of: DateTime<Local>) -> Result<()> {
        let today = as_of.date_naive();
        if self.state() == (FreshnessState::Fresh { verified_on: today }) && !self.table.is_empty() {
            return Ok(());
        }

        let outcome = self.check_and_repair(today).await;
        let next = match outcome {
            Ok(()) => FreshnessState::Fresh { verified_on: today },
            Err(ref e) => {
                log::warn!("Rate table refresh failed, keeping previous data: {}", e);
                FreshnessState::Stale
            }
        };
        self.state.send_replace(next);
        outcome
    }

    async fn check_and_repair(&mut self, today: NaiveDate) -> Result<()> {
        match self.store.modified(&self.feed_path).await? {
            None => {
                log::info!("Feed file {} missing, refreshing", self.feed_path.display());
                self.refresh().await
            }
            Some(mtime) if mtime.date_naive() != today => {
                log::info!(
                    "Feed file last written {}, refreshing for {}",
                    mtime.date_naive(),
                    today
                );
                self.refresh().await
            }
            Some(_) if self.table.is_empty() => {
                log::info!("Loading rate table from {}", self.feed_path.display());
                self.reload().await
            }
            Some(_) => Ok(()),
        }
    }

    async fn refresh(&mut self) -> Result<()> {
        self.state.send_replace(FreshnessState::Refreshing);

        self.downloader
            .download(&self.feed_url, &self.archive_path)
            .await?;
        self.extractor
            .extract(&self.archive_path, &self.feed_entry, &self.storage_dir)
            .await?;
        self.reload().await?;

        self.refresh_count += 1;
        log::info!("Rate table refreshed ({} records)", self.table.record_count());
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        let raw = self.store.read_to_string(&self.feed_path).await?;
        let table = self.loader.parse(&raw)?;
        self.table = Arc::new(table);
        self.reload_count += 1;
        Ok(())
    }
}
