//! Converter configuration
//!
//! Settings can be built in code with the `with_*` setters or loaded from a
//! TOML file. Every field has a default, so a config file only needs the keys
//! it overrides:
//!
//! ```toml
//! storage_dir = "/var/cache/eurofx"
//! enable_exact_date_index = true
//! ```

use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ECB historical reference rates archive
pub const DEFAULT_FEED_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-hist.zip";
pub const DEFAULT_ARCHIVE_FILE_NAME: &str = "eurofxref-hist.zip";
pub const DEFAULT_FEED_FILE_NAME: &str = "eurofxref-hist.csv";
pub const DEFAULT_QUEUE_WARN_DEPTH: usize = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Directory holding the downloaded archive and the extracted feed
    pub storage_dir: PathBuf,
    pub feed_url: String,
    pub archive_file_name: String,
    /// Archive entry extracted into `storage_dir`
    pub feed_file_name: String,
    pub base_currency: CurrencyCode,
    /// Build a date -> record index next to the sorted records
    pub enable_exact_date_index: bool,
    /// Pending task count above which enqueueing logs a warning
    pub queue_warn_depth: usize,
    pub http_timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            archive_file_name: DEFAULT_ARCHIVE_FILE_NAME.to_string(),
            feed_file_name: DEFAULT_FEED_FILE_NAME.to_string(),
            base_currency: CurrencyCode::eur(),
            enable_exact_date_index: false,
            queue_warn_depth: DEFAULT_QUEUE_WARN_DEPTH,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl ConverterConfig {
    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FxError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn with_storage_dir(mut self, storage_dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = storage_dir.into();
        self
    }

    pub fn with_feed_url(mut self, feed_url: impl Into<String>) -> Self {
        self.feed_url = feed_url.into();
        self
    }

    pub fn with_exact_date_index(mut self, enabled: bool) -> Self {
        self.enable_exact_date_index = enabled;
        self
    }

    pub fn with_base_currency(mut self, base_currency: CurrencyCode) -> Self {
        self.base_currency = base_currency;
        self
    }

    pub fn with_queue_warn_depth(mut self, depth: usize) -> Self {
        self.queue_warn_depth = depth;
        self
    }

    /// Path the downloaded archive is written to
    pub fn archive_path(&self) -> PathBuf {
        self.storage_dir.join(&self.archive_file_name)
    }

    /// Path of the extracted feed file
    pub fn feed_path(&self) -> PathBuf {
        self.storage_dir.join(&self.feed_file_name)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.storage_dir.as_os_str().is_empty() {
            return Err(FxError::ConfigError("storage_dir must not be empty".to_string()));
        }
        if self.feed_url.trim().is_empty() {
            return Err(FxError::ConfigError("feed_url must not be empty".to_string()));
        }
        for (key, name) in [
            ("archive_file_name", &self.archive_file_name),
            ("feed_file_name", &self.feed_file_name),
        ] {
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                return Err(FxError::ConfigError(format!(
                    "{} must be a plain file name, got '{}'",
                    key, name
                )));
            }
        }
        if self.archive_file_name == self.feed_file_name {
            return Err(FxError::ConfigError(
                "archive_file_name and feed_file_name must differ".to_string(),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(FxError::ConfigError("http_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("rusty_eurofx")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.base_currency.as_str(), "EUR");
        assert!(!config.enable_exact_date_index);
        assert!(config.storage_dir.ends_with("rusty_eurofx"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paths() {
        let config = ConverterConfig::default().with_storage_dir("/tmp/fx");
        assert_eq!(config.archive_path(), PathBuf::from("/tmp/fx/eurofxref-hist.zip"));
        assert_eq!(config.feed_path(), PathBuf::from("/tmp/fx/eurofxref-hist.csv"));
    }

    #[test]
    fn test_partial_toml() {
        let config = ConverterConfig::from_toml_str(
            r#"
            storage_dir = "/srv/fx"
            enable_exact_date_index = true
            base_currency = "eur"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/srv/fx"));
        assert!(config.enable_exact_date_index);
        assert_eq!(config.base_currency, CurrencyCode::eur());
        assert_eq!(config.queue_warn_depth, DEFAULT_QUEUE_WARN_DEPTH);
    }

    #[test]
    fn test_invalid_toml_values() {
        assert!(matches!(
            ConverterConfig::from_toml_str("base_currency = \"EURO\""),
            Err(FxError::TomlError(_))
        ));
        assert!(matches!(
            ConverterConfig::from_toml_str("feed_file_name = \"a/b.csv\""),
            Err(FxError::ConfigError(_))
        ));
        assert!(matches!(
            ConverterConfig::from_toml_str("http_timeout_secs = 0"),
            Err(FxError::ConfigError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eurofx.toml");
        std::fs::write(&path, "queue_warn_depth = 3\n").unwrap();

        let config = ConverterConfig::from_file(&path).unwrap();
        assert_eq!(config.queue_warn_depth, 3);

        let missing = ConverterConfig::from_file(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(FxError::ConfigError(_))));
    }
}
