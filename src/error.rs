use thiserror::Error;

/// Errors that abort a harvest run
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid selector for {field}: {reason}")]
    InvalidSelector { field: &'static str, reason: String },

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("WebDriver session could not be acquired: {0}")]
    WebDriver(String),

    #[error("Record sink error: {0}")]
    Sink(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;
