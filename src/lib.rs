// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod sink;

// Re-export commonly used types for convenience
pub use config::HarvestConfig;
pub use error::{HarvestError, Result};
pub use results::{Column, ListingStop, ProductRecord, RunSummary};

use crawlers::{Frontier, PageFetcher, WebDriverFetcher};
use sink::{CsvSink, RecordSink};
use std::path::{Path, PathBuf};

/// Main builder for a category harvest
pub struct Harvest {
    config: HarvestConfig,
}

impl Harvest {
    /// Create a new Harvest builder from a configuration
    pub fn new(config: HarvestConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(HarvestConfig::from_file(path)?))
    }

    /// Override the first listing page
    pub fn with_start_url(mut self, start_url: &str) -> Self {
        self.config.start_url = start_url.to_string();
        self
    }

    /// Override the number of products to collect
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.config.target_count = target_count;
        self
    }

    /// Override the CSV output file
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Override the WebDriver endpoint
    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.config.browser.webdriver_url = webdriver_url.to_string();
        self
    }

    /// Show or hide the browser window
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.browser.headless = headless;
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Start a browser, run the crawl and write the CSV
    ///
    /// The browser session is closed before returning, whether or not the
    /// run succeeded.
    pub async fn run(mut self) -> Result<RunSummary> {
        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.config.browser.webdriver_url = webdriver_url;
            }
        }

        self.config.validate()?;
        let frontier = Frontier::from_config(&self.config)?;
        let columns = self.config.output_columns()?;

        let mut fetcher = WebDriverFetcher::connect(&self.config.browser).await?;
        let mut sink = CsvSink::new(&self.config.output_path);

        let outcome = run_with(&frontier, &mut fetcher, &mut sink, &columns).await;

        if let Ok(summary) = &outcome {
            ::log::info!(
                "Wrote {} products to {}",
                summary.records_written,
                self.config.output_path.display()
            );
        }
        outcome
    }
}

/// Runs a harvest and then closes the fetcher, whatever the outcome
pub async fn run_with<F, S>(
    frontier: &Frontier,
    fetcher: &mut F,
    sink: &mut S,
    columns: &[Column],
) -> Result<RunSummary>
where
    F: PageFetcher + ?Sized,
    S: RecordSink + ?Sized,
{
    let outcome = harvest(frontier, fetcher, sink, columns).await;
    fetcher.close().await;
    outcome
}

/// Initializes the sink and runs both crawl phases
pub async fn harvest<F, S>(
    frontier: &Frontier,
    fetcher: &mut F,
    sink: &mut S,
    columns: &[Column],
) -> Result<RunSummary>
where
    F: PageFetcher + ?Sized,
    S: RecordSink + ?Sized,
{
    if let Err(e) = sink.initialize(columns) {
        ::log::error!("Could not initialize the record sink: {}", e);
        return Err(e);
    }
    Ok(frontier.run(fetcher, sink).await)
}
