//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone};
use rusty_eurofx::error::{FxError, Result};
use rusty_eurofx::feed::{ArchiveExtractor, Clock, FeedDownloader, FeedStore};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Excerpt of the ECB history, newest first, trailing comma included
pub const ECB_FEED: &str = "Date,USD,JPY,SEK,GBP,\n\
2016-09-05,1.1146,114.88,9.5183,0.83820,\n\
2016-09-02,1.1167,115.51,9.5510,0.84360,\n\
2016-09-01,1.1154,114.99,9.5068,0.84410,\n\
2016-01-04,1.0898,130.36,9.2178,0.73970,\n\
2015-12-31,1.0887,131.07,9.1895,0.73395,\n\
2015-12-30,1.0922,131.62,9.2157,0.73710,\n\
2015-01-02,1.2043,144.47,9.4300,0.78340,\n\
2014-12-31,1.2141,145.23,9.3930,0.77890,\n";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn noon(y: i32, m: u32, d: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

#[derive(Debug)]
pub struct FeedState {
    pub files: HashMap<PathBuf, (String, DateTime<Local>)>,
    pub remote: String,
    pub now: DateTime<Local>,
    pub fail_download: bool,
    pub downloads: usize,
    pub extractions: usize,
    pub stats: usize,
    pub reads: usize,
}

/// In-memory stand-in for the network, the archive and the disk
///
/// The "archive" is the feed text itself; extraction copies it to the
/// target directory stamped with the fake clock's time.
#[derive(Debug, Clone)]
pub struct FakeFeed(pub Arc<Mutex<FeedState>>);

impl FakeFeed {
    pub fn new(remote: &str, now: DateTime<Local>) -> Self {
        Self(Arc::new(Mutex::new(FeedState {
            files: HashMap::new(),
            remote: remote.to_string(),
            now,
            fail_download: false,
            downloads: 0,
            extractions: 0,
            stats: 0,
            reads: 0,
        })))
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FeedState> {
        self.0.lock().unwrap()
    }

    pub fn downloads(&self) -> usize {
        self.state().downloads
    }

    pub fn set_now(&self, now: DateTime<Local>) {
        self.state().now = now;
    }

    pub fn put_file(&self, path: PathBuf, contents: &str, mtime: DateTime<Local>) {
        self.state().files.insert(path, (contents.to_string(), mtime));
    }
}

impl FeedDownloader for FakeFeed {
    async fn download(&self, _url: &str, dest: &Path) -> Result<()> {
        let mut state = self.state();
        state.downloads += 1;
        if state.fail_download {
            return Err(FxError::FeedDownload("network unreachable".to_string()));
        }
        let entry = (state.remote.clone(), state.now);
        state.files.insert(dest.to_path_buf(), entry);
        Ok(())
    }
}

impl ArchiveExtractor for FakeFeed {
    async fn extract(&self, archive: &Path, entry: &str, target_dir: &Path) -> Result<()> {
        let mut state = self.state();
        state.extractions += 1;
        let (contents, _) = state
            .files
            .get(archive)
            .cloned()
            .ok_or_else(|| FxError::FeedExtraction(format!("{} missing", archive.display())))?;
        let now = state.now;
        state.files.insert(target_dir.join(entry), (contents, now));
        Ok(())
    }
}

impl FeedStore for FakeFeed {
    async fn modified(&self, path: &Path) -> Result<Option<DateTime<Local>>> {
        let mut state = self.state();
        state.stats += 1;
        Ok(state.files.get(path).map(|(_, mtime)| *mtime))
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let mut state = self.state();
        state.reads += 1;
        state
            .files
            .get(path)
            .map(|(contents, _)| contents.clone())
            .ok_or_else(|| FxError::FeedRead(format!("{} missing", path.display())))
    }
}

impl Clock for FakeFeed {
    fn now(&self) -> DateTime<Local> {
        self.state().now
    }
}
