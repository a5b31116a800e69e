use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "category-harvest")]
#[command(about = "Collects product pages from a paginated category and writes them to CSV")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First listing page of the category
    #[arg(short, long)]
    pub start_url: Option<String>,

    /// Number of products to collect and scrape
    #[arg(short, long)]
    pub target: Option<usize>,

    /// CSV file to append records to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// WebDriver endpoint (WEBDRIVER_URL takes precedence)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Show the browser window
    #[arg(long, default_value_t = false)]
    pub headed: bool,
}
