//! HTTP download of the feed archive

use super::FeedDownloader;
use crate::error::{FxError, Result};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// Downloads the feed archive with a plain GET request
#[derive(Debug, Clone)]
pub struct HttpFeedDownloader {
    client: Client,
}

impl HttpFeedDownloader {
    /// Create a downloader with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rusty_eurofx/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FxError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl FeedDownloader for HttpFeedDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        log::info!("Downloading feed archive from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FxError::FeedDownload(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FxError::FeedDownload(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FxError::FeedDownload(format!("Failed to read response: {}", e)))?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                FxError::FeedDownload(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        tokio::fs::write(dest, &bytes).await.map_err(|e| {
            FxError::FeedDownload(format!("Failed to write {}: {}", dest.display(), e))
        })?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), dest.display());
        Ok(())
    }
}
