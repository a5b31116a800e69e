use category_harvest::{Harvest, HarvestConfig};
use clap::Parser;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut harvest = match &args.config {
        Some(path) => match Harvest::from_config_file(path) {
            Ok(harvest) => harvest,
            Err(e) => {
                ::log::error!("Failed to load configuration from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Harvest::new(HarvestConfig::default()),
    };

    if let Some(start_url) = &args.start_url {
        harvest = harvest.with_start_url(start_url);
    }
    if let Some(target) = args.target {
        harvest = harvest.with_target_count(target);
    }
    if let Some(output) = args.output {
        harvest = harvest.with_output_path(output);
    }
    if let Some(webdriver_url) = &args.webdriver_url {
        harvest = harvest.with_webdriver_url(webdriver_url);
    }
    if args.headed {
        harvest = harvest.with_headless(false);
    }

    ::log::info!("Starting category harvest for: {}", harvest.config().start_url);
    println!("Note: Harvesting requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    let start_time = std::time::Instant::now();
    match harvest.run().await {
        Ok(summary) => {
            ::log::info!(
                "Listing traversal ended with {:?} after {} pages, {} product URLs collected",
                summary.phase_one_end,
                summary.listing_pages_visited,
                summary.product_urls_collected
            );
            ::log::info!(
                "Harvest complete - {} records written, {} fetch failures, {} parse failures, {} write failures in {:.2} seconds",
                summary.records_written,
                summary.fetch_failures,
                summary.parse_failures,
                summary.write_failures,
                start_time.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            ::log::error!("Harvest aborted: {}", e);
            std::process::exit(1);
        }
    }
}
