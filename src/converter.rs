//! Point-in-time currency conversion
//!
//! `CurrencyConverter` is the public entry point. Amounts and currency codes
//! are validated up front; everything else runs on the conversion queue's
//! single worker, which refreshes the rate table when it is stale, resolves
//! the record for the requested date and computes the result.
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use rusty_eurofx::prelude::*;
//!
//! # async fn run() -> rusty_eurofx::error::Result<()> {
//! let converter = CurrencyConverter::new(
//!     ConverterConfig::default().with_storage_dir("/tmp/eurofx"),
//! )?;
//!
//! // Saturday -> Friday's rates
//! let date = NaiveDate::from_ymd_opt(2016, 9, 3).unwrap();
//! let result = converter.convert("15", date, "USD", "SEK").await?;
//! assert_eq!(result.used_date, NaiveDate::from_ymd_opt(2016, 9, 2));
//! # Ok(())
//! # }
//! ```

pub mod amount;
pub mod conversion;
pub mod queue;

pub use amount::IntoAmount;
pub use conversion::{convert_with_record, round_value, ConversionRequest, ConversionResult};
pub use queue::{ConversionQueue, ReplyReceiver};

use crate::config::ConverterConfig;
use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use crate::feed::refresher::{Clock, FeedRefresher, FreshnessState, SystemClock};
use crate::feed::sources::{
    ArchiveExtractor, FeedDownloader, FeedStore, HttpFeedDownloader, LocalFeedStore,
    ZipArchiveExtractor,
};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

static DEFAULT_INSTANCE: OnceLock<CurrencyConverter> = OnceLock::new();
static DEFAULT_INIT: Mutex<()> = Mutex::new(());

/// Converts amounts between currencies using the rates published for a date
///
/// Cloning is not supported; share the converter by reference or `Arc`.
/// Independent instances with their own storage directory each run their
/// own worker.
#[derive(Debug)]
pub struct CurrencyConverter {
    queue: ConversionQueue,
    freshness: watch::Receiver<FreshnessState>,
    base_currency: CurrencyCode,
    storage_dir: PathBuf,
}

impl CurrencyConverter {
    /// Create a converter backed by the HTTP feed, zip extraction and the local filesystem
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;
        let downloader = HttpFeedDownloader::new(Duration::from_secs(config.http_timeout_secs))?;
        Self::with_collaborators(config, downloader, ZipArchiveExtractor, LocalFeedStore, SystemClock)
    }

    /// Create a converter with custom collaborators
    pub fn with_collaborators<D, X, S, C>(
        config: ConverterConfig,
        downloader: D,
        extractor: X,
        store: S,
        clock: C,
    ) -> Result<Self>
    where
        D: FeedDownloader,
        X: ArchiveExtractor,
        S: FeedStore,
        C: Clock,
    {
        config.validate()?;
        let refresher = FeedRefresher::new(&config, downloader, extractor, store);
        let freshness = refresher.subscribe();
        let queue = ConversionQueue::spawn(
            refresher,
            clock,
            config.base_currency.clone(),
            config.queue_warn_depth,
        )?;

        log::info!(
            "Currency converter started (storage dir: {}, exact date index: {})",
            config.storage_dir.display(),
            config.enable_exact_date_index
        );

        Ok(Self {
            queue,
            freshness,
            base_currency: config.base_currency,
            storage_dir: config.storage_dir,
        })
    }

    /// Process-wide shared converter
    ///
    /// Built from `ConverterConfig::default()` on the first call; later calls
    /// return the same instance. A failed construction is not cached, so the
    /// next call tries again.
    pub fn default_instance() -> Result<&'static CurrencyConverter> {
        if let Some(converter) = DEFAULT_INSTANCE.get() {
            return Ok(converter);
        }

        let _guard = DEFAULT_INIT.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(converter) = DEFAULT_INSTANCE.get() {
            return Ok(converter);
        }
        let converter = Self::new(ConverterConfig::default())?;
        Ok(DEFAULT_INSTANCE.get_or_init(|| converter))
    }

    /// Convert `amount` from one currency to another using the rates of `date`
    ///
    /// Dates without published rates use the most recent earlier record.
    pub async fn convert<A: IntoAmount>(
        &self,
        amount: A,
        date: NaiveDate,
        from: &str,
        to: &str,
    ) -> Result<ConversionResult> {
        let reply = self.enqueue(amount, date, from, to)?;
        reply.await.map_err(|_| FxError::QueueClosed)?
    }

    /// Blocking variant of [`convert`](Self::convert)
    ///
    /// Must not be called from within an async runtime.
    pub fn convert_blocking<A: IntoAmount>(
        &self,
        amount: A,
        date: NaiveDate,
        from: &str,
        to: &str,
    ) -> Result<ConversionResult> {
        let reply = self.enqueue(amount, date, from, to)?;
        reply.blocking_recv().map_err(|_| FxError::QueueClosed)?
    }

    /// Validate and queue a conversion, returning its completion channel
    pub fn enqueue<A: IntoAmount>(
        &self,
        amount: A,
        date: NaiveDate,
        from: &str,
        to: &str,
    ) -> Result<ReplyReceiver> {
        let request = ConversionRequest {
            amount: amount.into_amount()?,
            date,
            from: CurrencyCode::parse(from)?,
            to: CurrencyCode::parse(to)?,
        };
        self.queue.submit(request)
    }

    /// Conversions waiting for the worker
    pub fn queue_depth(&self) -> usize {
        self.queue.depth()
    }

    /// Freshness of the rate table as last published by the worker
    pub fn freshness(&self) -> FreshnessState {
        *self.freshness.borrow()
    }

    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}
