//! Zip extraction of the feed file

use super::ArchiveExtractor;
use crate::error::{FxError, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Extracts one entry of a zip archive, ignoring any directory prefix
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveExtractor;

impl ZipArchiveExtractor {
    fn extract_sync(archive: &Path, entry: &str, target_dir: &Path) -> Result<PathBuf> {
        let file = File::open(archive).map_err(|e| {
            FxError::FeedExtraction(format!("Failed to open {}: {}", archive.display(), e))
        })?;
        let mut zip = ZipArchive::new(file)
            .map_err(|e| FxError::FeedExtraction(format!("Failed to read ZIP: {}", e)))?;

        let mut source = zip
            .by_name(entry)
            .map_err(|e| FxError::FeedExtraction(format!("Entry '{}' not found: {}", entry, e)))?;

        let file_name = Path::new(entry)
            .file_name()
            .ok_or_else(|| FxError::FeedExtraction(format!("Invalid entry name '{}'", entry)))?;

        std::fs::create_dir_all(target_dir).map_err(|e| {
            FxError::FeedExtraction(format!("Failed to create {}: {}", target_dir.display(), e))
        })?;
        let target = target_dir.join(file_name);
        let mut out = File::create(&target).map_err(|e| {
            FxError::FeedExtraction(format!("Failed to create {}: {}", target.display(), e))
        })?;
        io::copy(&mut source, &mut out).map_err(|e| {
            FxError::FeedExtraction(format!("Failed to extract '{}': {}", entry, e))
        })?;

        Ok(target)
    }
}

impl ArchiveExtractor for ZipArchiveExtractor {
    async fn extract(&self, archive: &Path, entry: &str, target_dir: &Path) -> Result<()> {
        let archive = archive.to_path_buf();
        let entry_name = entry.to_string();
        let target_dir = target_dir.to_path_buf();

        let target = tokio::task::spawn_blocking(move || {
            Self::extract_sync(&archive, &entry_name, &target_dir)
        })
        .await
        .map_err(|e| FxError::FeedExtraction(format!("Extraction task failed: {}", e)))??;

        log::debug!("Extracted '{}' to {}", entry, target.display());
        Ok(())
    }
}
