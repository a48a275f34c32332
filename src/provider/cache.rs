//! On-disk cache of provider responses, keyed by request URL.

use crate::error::TelgetError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Response cache rooted at one directory.
///
/// Each entry is `<dir>/<blake3(url)>.json` holding the raw response body.
#[derive(Debug, Clone)]
pub struct HttpCache {
    dir: Option<PathBuf>,
}

impl HttpCache {
    /// Enable the cache at `dir`, creating the directory when missing.
    pub fn enable(dir: impl Into<PathBuf>) -> Result<Self, TelgetError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            TelgetError::CacheError(format!(
                "Failed to create cache directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir: Some(dir) })
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn key_for(url: &str) -> String {
        blake3::hash(url.as_bytes()).to_hex().to_string()
    }

    pub fn entry_path(&self, url: &str) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", Self::key_for(url))))
    }

    /// Cached body for `url`, if any. Unreadable entries count as misses.
    pub fn get(&self, url: &str) -> Option<String> {
        let path = self.entry_path(url)?;
        match std::fs::read_to_string(&path) {
            Ok(body) => {
                debug!(url, path = %path.display(), "cache hit");
                Some(body)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable cache entry, refetching");
                None
            }
        }
    }

    /// Store `body` for `url`. Empty list bodies are skipped so that a session
    /// fetched before its data was published is not pinned empty.
    pub fn put(&self, url: &str, body: &str) -> Result<(), TelgetError> {
        let Some(path) = self.entry_path(url) else {
            return Ok(());
        };
        if is_empty_list(body) {
            debug!(url, "not caching empty response");
            return Ok(());
        }
        let tmp = path.with_extension("json.part");
        std::fs::write(&tmp, body)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|e| {
                TelgetError::CacheError(format!(
                    "Failed to write cache entry {}: {}",
                    path.display(),
                    e
                ))
            })
    }

    /// Drop the entry for `url`. Missing entries are not an error.
    pub fn remove(&self, url: &str) {
        let Some(path) = self.entry_path(url) else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(url, "cache entry removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove cache entry"),
        }
    }
}

fn is_empty_list(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.starts_with('[')
        && trimmed.ends_with(']')
        && trimmed[1..trimmed.len() - 1].trim().is_empty()
}
