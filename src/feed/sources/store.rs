//! Local filesystem access to the extracted feed

use super::FeedStore;
use crate::error::{FxError, Result};
use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFeedStore;

impl FeedStore for LocalFeedStore {
    async fn modified(&self, path: &Path) -> Result<Option<DateTime<Local>>> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => {
                let mtime = metadata.modified().map_err(|e| {
                    FxError::FeedRead(format!("No modification time for {}: {}", path.display(), e))
                })?;
                Ok(Some(DateTime::<Local>::from(mtime)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FxError::FeedRead(format!(
                "Failed to stat {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FxError::FeedRead(format!("Failed to read {}: {}", path.display(), e)))
    }
}
