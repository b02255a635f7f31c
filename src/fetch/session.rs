// src/fetch/session.rs

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::{debug, info, warn};
use url::Url;

use super::{cache::ResponseCache, Transport};

/// Blocking HTTP client with an on-disk response cache in front of it.
pub struct CachedSession {
    client: Client,
    cache: ResponseCache,
}

impl CachedSession {
    pub fn new(cache: ResponseCache) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, cache })
    }

    pub fn clear_cache(&self) -> Result<()> {
        let removed = self.cache.clear()?;
        info!(removed, dir = %self.cache.dir().display(), "cache cleared");
        Ok(())
    }
}

impl Transport for CachedSession {
    fn get_text(&self, url: &Url) -> Result<String> {
        if let Some(hit) = self.cache.get(url) {
            debug!(%url, fetched_at = %hit.fetched_at, "cache hit");
            return Ok(hit.body);
        }
        let resp = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .with_context(|| format!("Reading text from {}", url))?;
        if let Err(e) = self.cache.put(url, status, &body) {
            warn!(%url, "caching response failed: {:#}", e);
        }
        Ok(body)
    }

    fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .bytes()
            .with_context(|| format!("Reading body from {}", url))?;
        Ok(bytes.to_vec())
    }
}
