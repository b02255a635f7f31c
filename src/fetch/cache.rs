// src/fetch/cache.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};
use url::Url;

/// One stored response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    pub fetched_at: DateTime<Utc>,
    pub body: String,
}

/// On-disk response store keyed by request URL. Each entry is a JSON file
/// named by the SHA-256 of the URL.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("creating cache directory {:?}", &dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, url: &Url) -> PathBuf {
        let digest = Sha256::digest(url.as_str().as_bytes());
        self.dir.join(format!("{:x}.json", digest))
    }

    /// Stored entry for `url`. Unreadable entries are treated as misses.
    pub fn get(&self, url: &Url) -> Option<CachedResponse> {
        let path = self.entry_path(url);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<CachedResponse>(&raw) {
            Ok(entry) if entry.url == url.as_str() => Some(entry),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache entry ignored");
                None
            }
        }
    }

    pub fn put(&self, url: &Url, status: u16, body: &str) -> Result<()> {
        let entry = CachedResponse {
            url: url.to_string(),
            status,
            fetched_at: Utc::now(),
            body: body.to_string(),
        };
        let path = self.entry_path(url);
        let json = serde_json::to_string(&entry)?;
        fs::write(&path, json).with_context(|| format!("writing cache entry {:?}", &path))?;
        debug!(%url, path = %path.display(), "cached response");
        Ok(())
    }

    /// Remove every entry. Returns how many were deleted.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("listing cache directory {:?}", &self.dir))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).with_context(|| format!("removing {:?}", &path))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
