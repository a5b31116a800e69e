use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a page could not be turned into markup
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {timeout:?} waiting for {url} to load")]
    Timeout { url: String, timeout: Duration },

    #[error("failed to read page source for {url}: {reason}")]
    Source { url: String, reason: String },

    #[error("browser session lost while loading {url}")]
    SessionLost { url: String },
}

/// Renders a URL into HTML
///
/// One attempt per call; callers decide what a failure means.
#[async_trait]
pub trait PageFetcher: Send {
    async fn fetch(&mut self, url: &Url) -> Result<String, FetchError>;

    /// Release whatever the fetcher holds open; called once at the end of a run
    async fn close(&mut self) {}
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;

    /// Serves canned markup and records every URL it was asked for
    #[derive(Debug, Default)]
    pub struct FakeFetcher {
        pages: HashMap<String, String>,
        pub requests: Vec<String>,
        pub closes: usize,
    }

    impl FakeFetcher {
        pub fn with_page(mut self, url: &str, markup: &str) -> Self {
            self.pages.insert(url.to_string(), markup.to_string());
            self
        }

        pub fn request_count(&self, url: &str) -> usize {
            self.requests.iter().filter(|r| *r == url).count()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&mut self, url: &Url) -> Result<String, FetchError> {
            self.requests.push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Navigation {
                    url: url.to_string(),
                    reason: "no such page".to_string(),
                })
        }

        async fn close(&mut self) {
            self.closes += 1;
        }
    }
}
