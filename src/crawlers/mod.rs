pub mod fetcher;
pub mod frontier;
pub mod webdriver;

pub use fetcher::{FetchError, PageFetcher};
pub use frontier::Frontier;
pub use webdriver::WebDriverFetcher;
