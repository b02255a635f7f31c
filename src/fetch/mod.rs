// src/fetch/mod.rs

use anyhow::Result;
use scraper::Html;
use tracing::{debug, error};
use url::Url;

pub mod cache;
pub mod session;

pub use cache::ResponseCache;
pub use session::CachedSession;

/// The HTTP side of the scraper. `CachedSession` is the real one; tests
/// plug in canned pages.
pub trait Transport {
    /// GET `url` as text, served from the response cache when possible.
    fn get_text(&self, url: &Url) -> Result<String>;

    /// GET `url` as raw bytes, always from the network.
    fn get_bytes(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Fetch and parse a page. Failures are logged with the URL and come back
/// as `None`; callers skip whatever the page was needed for.
pub fn get_page(transport: &dyn Transport, url: &Url) -> Option<Html> {
    debug!(%url, "fetching page");
    match transport.get_text(url) {
        Ok(body) => Some(Html::parse_document(&body)),
        Err(e) => {
            error!(%url, "page load failed: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use anyhow::anyhow;
    use std::{cell::RefCell, collections::HashMap};

    /// In-memory transport serving fixed bodies keyed by absolute URL.
    #[derive(Default)]
    pub struct FakeTransport {
        pages: HashMap<String, String>,
        blobs: HashMap<String, Vec<u8>>,
        pub requests: RefCell<Vec<String>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn blob(mut self, url: &str, bytes: &[u8]) -> Self {
            self.blobs.insert(url.to_string(), bytes.to_vec());
            self
        }
    }

    impl Transport for FakeTransport {
        fn get_text(&self, url: &Url) -> Result<String> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| anyhow!("404 Not Found for {}", url))
        }

        fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
            self.requests.borrow_mut().push(url.to_string());
            self.blobs
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| anyhow!("404 Not Found for {}", url))
        }
    }
}
