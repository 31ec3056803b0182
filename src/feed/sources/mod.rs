//! External collaborators used by the feed refresher
//!
//! - **http**: downloads the remote feed archive
//! - **archive**: extracts the feed file from the archive
//! - **store**: filesystem metadata and reads for the extracted feed
//!
//! Each concern is a trait so tests and embedders can substitute their own
//! implementation.

pub mod archive;
pub mod http;
pub mod store;

pub use archive::ZipArchiveExtractor;
pub use http::HttpFeedDownloader;
pub use store::LocalFeedStore;

use crate::error::Result;
use chrono::{DateTime, Local};
use std::future::Future;
use std::path::Path;

/// Fetches the remote feed archive
pub trait FeedDownloader: Send + Sync + 'static {
    /// Download `url` into the file at `dest`, replacing it
    fn download(&self, url: &str, dest: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Extracts a single named entry from an archive
pub trait ArchiveExtractor: Send + Sync + 'static {
    /// Extract `entry` from `archive` into `target_dir`, overwriting any existing file
    fn extract(
        &self,
        archive: &Path,
        entry: &str,
        target_dir: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Read access to the extracted feed file
pub trait FeedStore: Send + Sync + 'static {
    /// Last modification time, or `None` if the file does not exist
    fn modified(&self, path: &Path) -> impl Future<Output = Result<Option<DateTime<Local>>>> + Send;

    /// Full file contents as text
    fn read_to_string(&self, path: &Path) -> impl Future<Output = Result<String>> + Send;
}
