use crate::config::BrowserConfig;
use crate::crawlers::fetcher::{FetchError, PageFetcher};
use crate::error::{HarvestError, Result};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::Duration;
use url::Url;

/// Endpoints tried when the configured WebDriver URL does not answer
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Fetches pages through a single WebDriver browser session
pub struct WebDriverFetcher {
    client: Client,
    fetch_timeout: Duration,
    settle_delay: Duration,
}

impl WebDriverFetcher {
    /// Starts a browser session
    ///
    /// Tries the configured endpoint first, then the common defaults of
    /// other drivers. Failing all of them is fatal for the run.
    pub async fn connect(config: &BrowserConfig) -> Result<Self> {
        ::log::info!("Initializing WebDriver at {}", config.webdriver_url);

        let client = connect_to_webdriver(config).await?;
        ::log::info!("WebDriver initialized successfully");

        Ok(Self {
            client,
            fetch_timeout: config.fetch_timeout(),
            settle_delay: config.settle_delay(),
        })
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch(&mut self, url: &Url) -> std::result::Result<String, FetchError> {
        ::log::info!("Fetching {}...", url);
        let started = std::time::Instant::now();

        self.client
            .goto(url.as_str())
            .await
            .map_err(|e| navigation_error(e, url))?;

        self.client
            .wait()
            .at_most(self.fetch_timeout)
            .for_element(Locator::Css("body"))
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => FetchError::Timeout {
                    url: url.to_string(),
                    timeout: self.fetch_timeout,
                },
                other => navigation_error(other, url),
            })?;

        tokio::time::sleep(self.settle_delay).await;

        let html = self.client.source().await.map_err(|e| {
            if is_session_lost(&e) {
                FetchError::SessionLost {
                    url: url.to_string(),
                }
            } else {
                FetchError::Source {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        ::log::debug!(
            "Fetched {} ({} bytes) in {:.2} seconds",
            url,
            html.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(html)
    }

    /// Ends the browser session
    async fn close(&mut self) {
        ::log::info!("Quitting WebDriver...");
        // The session handle is shared between clones
        match self.client.clone().close().await {
            Ok(()) => ::log::info!("WebDriver quit successfully"),
            Err(e) => ::log::warn!("Failed to close WebDriver session: {}", e),
        }
    }
}

/// Browser capabilities for a Chrome session
fn capabilities(config: &BrowserConfig) -> Map<String, Value> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        format!("--window-size={}", config.window_size),
        format!("--user-agent={}", config.user_agent),
    ];
    if config.headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }

    let mut caps = Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": args,
            "excludeSwitches": ["enable-logging"],
        }),
    );
    caps
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(config: &BrowserConfig) -> Result<Client> {
    let first_error = match try_connect(&config.webdriver_url, config).await {
        Ok(client) => return Ok(client),
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                config.webdriver_url,
                e
            );
            e
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == config.webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = try_connect(url, config).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(HarvestError::WebDriver(first_error))
}

async fn try_connect(webdriver_url: &str, config: &BrowserConfig) -> std::result::Result<Client, String> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(config));
    builder
        .connect(webdriver_url)
        .await
        .map_err(|e| e.to_string())
}

fn is_session_lost(error: &CmdError) -> bool {
    error.to_string().contains("Unable to find session")
}

/// Maps a navigation failure, noting lost sessions separately
fn navigation_error(error: CmdError, url: &Url) -> FetchError {
    if is_session_lost(&error) {
        ::log::warn!("Lost session while accessing {}", url);
        FetchError::SessionLost {
            url: url.to_string(),
        }
    } else {
        FetchError::Navigation {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}
