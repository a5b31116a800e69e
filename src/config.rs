use crate::error::{HarvestError, Result};
use crate::results::Column;
use scraper::Selector;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration for a harvest run
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// First listing page of the category
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// Number of product pages to collect and scrape
    #[serde(default = "default_target_count")]
    pub target_count: usize,

    /// CSV file the records are appended to
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Output columns, in order
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,

    /// Path fragment that marks a product detail page
    #[serde(default = "default_detail_path_marker")]
    pub detail_path_marker: String,

    /// Browser session settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// CSS selectors for listing and product pages
    #[serde(default)]
    pub selectors: Selectors,
}

/// Settings for the WebDriver-controlled browser
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Window size as "width,height"
    #[serde(default = "default_window_size")]
    pub window_size: String,

    /// Upper bound on waiting for the page body to appear
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Pause after the body appears so deferred content can render
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,
}

/// CSS selectors used by the link and field extractors
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub product_link: String,
    pub next_page: String,
    pub title: String,
    /// Price container
    pub price: String,
    /// Whole units, searched within the price container
    pub price_whole: String,
    /// Fractional units, searched within the price container
    pub price_fraction: String,
    pub seller: String,
    pub description_bullets: String,
    pub rating: String,
    pub image: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            product_link: "div.item-container a.item-title".to_string(),
            next_page: r#"a[title="Next"]"#.to_string(),
            title: "h1.product-title".to_string(),
            price: "div.price-current".to_string(),
            price_whole: "strong".to_string(),
            price_fraction: "sup".to_string(),
            seller: "div.product-seller-sold-by strong".to_string(),
            description_bullets: "div.product-bullets ul li".to_string(),
            rating: "div.product-rating i.rating".to_string(),
            image: "img.product-view-img-original".to_string(),
        }
    }
}

/// Parsed selectors, built once and shared by every page
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub product_link: Selector,
    pub next_page: Selector,
    pub title: Selector,
    pub price: Selector,
    pub price_whole: Selector,
    pub price_fraction: Selector,
    pub seller: Selector,
    pub description_bullets: Selector,
    pub rating: Selector,
    pub image: Selector,
}

impl Selectors {
    /// Parse every selector, naming the field that failed
    pub fn compile(&self) -> Result<CompiledSelectors> {
        Ok(CompiledSelectors {
            product_link: compile_one("product_link", &self.product_link)?,
            next_page: compile_one("next_page", &self.next_page)?,
            title: compile_one("title", &self.title)?,
            price: compile_one("price", &self.price)?,
            price_whole: compile_one("price_whole", &self.price_whole)?,
            price_fraction: compile_one("price_fraction", &self.price_fraction)?,
            seller: compile_one("seller", &self.seller)?,
            description_bullets: compile_one("description_bullets", &self.description_bullets)?,
            rating: compile_one("rating", &self.rating)?,
            image: compile_one("image", &self.image)?,
        })
    }
}

impl Default for CompiledSelectors {
    fn default() -> Self {
        // The built-in selectors are constants and always parse.
        Selectors::default()
            .compile()
            .expect("Default selectors should be valid")
    }
}

fn compile_one(field: &'static str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| HarvestError::InvalidSelector {
        field,
        reason: e.to_string(),
    })
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            user_agent: default_user_agent(),
            window_size: default_window_size(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            settle_delay_secs: default_settle_delay_secs(),
        }
    }
}

impl BrowserConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            target_count: default_target_count(),
            output_path: default_output_path(),
            columns: default_columns(),
            detail_path_marker: default_detail_path_marker(),
            browser: BrowserConfig::default(),
            selectors: Selectors::default(),
        }
    }
}

impl HarvestConfig {
    /// Create a configuration for the given start URL with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Parsed start URL
    pub fn start_url(&self) -> Result<Url> {
        Url::parse(&self.start_url).map_err(|source| HarvestError::InvalidUrl {
            url: self.start_url.clone(),
            source,
        })
    }

    /// Output columns resolved against the known record fields
    pub fn output_columns(&self) -> Result<Vec<Column>> {
        if self.columns.is_empty() {
            return Err(HarvestError::Config("columns must not be empty".to_string()));
        }
        self.columns
            .iter()
            .map(|name| {
                Column::from_name(name)
                    .ok_or_else(|| HarvestError::Config(format!("unknown output column: {name}")))
            })
            .collect()
    }

    /// Check everything that can be checked before a browser is started
    pub fn validate(&self) -> Result<()> {
        self.start_url()?;
        self.output_columns()?;
        self.selectors.compile()?;

        if self.target_count == 0 {
            return Err(HarvestError::Config(
                "target_count must be at least 1".to_string(),
            ));
        }
        if self.detail_path_marker.is_empty() {
            return Err(HarvestError::Config(
                "detail_path_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_start_url() -> String {
    "https://www.newegg.com/Headphones-Accessories/SubCategory/ID-70?PageSize=96".to_string()
}

fn default_target_count() -> usize {
    500
}

fn default_output_path() -> PathBuf {
    PathBuf::from("headphone_products.csv")
}

fn default_columns() -> Vec<String> {
    Column::ALL.iter().map(|c| c.name().to_string()).collect()
}

fn default_detail_path_marker() -> String {
    "/p/".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_window_size() -> String {
    "1920,1080".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_settle_delay_secs() -> u64 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = HarvestConfig::from_json("{}").unwrap();
        assert_eq!(config.target_count, 500);
        assert_eq!(config.detail_path_marker, "/p/");
        assert_eq!(config.browser.fetch_timeout_secs, 10);
        assert_eq!(config.browser.settle_delay_secs, 2);
        assert!(config.browser.headless);
        assert_eq!(
            config.columns,
            vec![
                "product_title",
                "product_description",
                "product_price",
                "product_rating",
                "seller_name",
                "main_image_url",
            ]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_selectors_keep_other_defaults() {
        let json = r#"{
            "start_url": "https://shop.example/c/1",
            "target_count": 3,
            "selectors": { "title": "h1.name" }
        }"#;
        let config = HarvestConfig::from_json(json).unwrap();
        assert_eq!(config.selectors.title, "h1.name");
        assert_eq!(config.selectors.price, "div.price-current");
        assert_eq!(config.target_count, 3);
    }

    #[test]
    fn test_invalid_selector_names_field() {
        let mut config = HarvestConfig::default();
        config.selectors.rating = "div[".to_string();
        match config.validate() {
            Err(HarvestError::InvalidSelector { field, .. }) => assert_eq!(field, "rating"),
            other => panic!("expected selector error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_column_rejected() {
        let mut config = HarvestConfig::default();
        config.columns.push("sku".to_string());
        assert!(matches!(config.validate(), Err(HarvestError::Config(_))));
    }

    #[test]
    fn test_zero_target_rejected() {
        let mut config = HarvestConfig::default();
        config.target_count = 0;
        assert!(matches!(config.validate(), Err(HarvestError::Config(_))));
    }

    #[test]
    fn test_bad_start_url_rejected() {
        let config = HarvestConfig::new("not a url");
        assert!(matches!(
            config.validate(),
            Err(HarvestError::InvalidUrl { .. })
        ));
    }
}
