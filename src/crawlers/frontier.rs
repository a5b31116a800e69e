use crate::config::{CompiledSelectors, HarvestConfig};
use crate::crawlers::fetcher::PageFetcher;
use crate::error::Result;
use crate::filter::ProductUrlFilter;
use crate::parsers::{listing, product};
use crate::results::{ListingStop, RunSummary};
use crate::sink::RecordSink;
use std::collections::HashSet;
use url::Url;

/// Product URLs gathered from the listing pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// First-seen order, never longer than the target count
    pub product_urls: Vec<Url>,
    pub listing_pages_visited: usize,
    pub stop: ListingStop,
}

/// Drives listing traversal and then the product page visits
#[derive(Debug, Clone)]
pub struct Frontier {
    start_url: Url,
    target_count: usize,
    selectors: CompiledSelectors,
    filter: ProductUrlFilter,
}

impl Frontier {
    pub fn new(
        start_url: Url,
        target_count: usize,
        selectors: CompiledSelectors,
        filter: ProductUrlFilter,
    ) -> Self {
        let start_url = filter.normalize_url(&start_url);
        Self {
            start_url,
            target_count,
            selectors,
            filter,
        }
    }

    pub fn from_config(config: &HarvestConfig) -> Result<Self> {
        Ok(Self::new(
            config.start_url()?,
            config.target_count,
            config.selectors.compile()?,
            ProductUrlFilter::new(&config.detail_path_marker),
        ))
    }

    /// Runs both phases and reports the totals
    pub async fn run<F, S>(&self, fetcher: &mut F, sink: &mut S) -> RunSummary
    where
        F: PageFetcher + ?Sized,
        S: RecordSink + ?Sized,
    {
        let collection = self.collect_product_urls(fetcher).await;
        let mut summary = self.scrape_products(fetcher, sink, &collection.product_urls).await;
        summary.listing_pages_visited = collection.listing_pages_visited;
        summary.phase_one_end = Some(collection.stop);
        summary
    }

    /// Follows "next page" links from the start URL, gathering product URLs
    pub async fn collect_product_urls<F>(&self, fetcher: &mut F) -> Collection
    where
        F: PageFetcher + ?Sized,
    {
        ::log::info!("--- Starting URL collection phase ---");

        let mut visited: HashSet<String> = HashSet::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut product_urls: Vec<Url> = Vec::new();
        let mut current = Some(self.start_url.clone());

        let stop = loop {
            if product_urls.len() >= self.target_count {
                break ListingStop::TargetReached;
            }
            let Some(listing_url) = current.take() else {
                break ListingStop::NoNextPage;
            };

            if !visited.insert(listing_url.as_str().to_string()) {
                ::log::warn!(
                    "Already visited listing page {}. Stopping to prevent a loop.",
                    listing_url
                );
                break ListingStop::CycleDetected;
            }

            ::log::info!("Processing listing page {}: {}", visited.len(), listing_url);
            ::log::info!(
                "Collected {} URLs so far (target: {})",
                product_urls.len(),
                self.target_count
            );

            let markup = match fetcher.fetch(&listing_url).await {
                Ok(markup) => markup,
                Err(e) => {
                    ::log::error!(
                        "Failed to fetch listing page {}: {}. Stopping URL collection.",
                        listing_url,
                        e
                    );
                    break ListingStop::FetchFailed;
                }
            };

            let links = listing::extract(&markup, &listing_url, &self.selectors, &self.filter);

            let before = product_urls.len();
            for url in links.product_urls {
                if product_urls.len() >= self.target_count {
                    break;
                }
                if seen.insert(url.as_str().to_string()) {
                    product_urls.push(url);
                }
            }
            ::log::info!(
                "Added {} new unique product URLs from this page",
                product_urls.len() - before
            );

            current = links.next_page;
            if product_urls.len() >= self.target_count {
                ::log::info!("Reached target of {} product URLs", self.target_count);
                break ListingStop::TargetReached;
            }
            if current.is_none() {
                ::log::info!("No more next-page links found on listing pages");
                break ListingStop::NoNextPage;
            }
        };

        ::log::info!(
            "--- URL collection finished: {} unique product URLs from {} listing pages ({:?}) ---",
            product_urls.len(),
            visited.len(),
            stop
        );

        Collection {
            product_urls,
            listing_pages_visited: visited.len(),
            stop,
        }
    }

    /// Visits each product URL in order, writing every parsed record
    ///
    /// A failed fetch, an unparseable page or a failed write skips that
    /// product only.
    pub async fn scrape_products<F, S>(
        &self,
        fetcher: &mut F,
        sink: &mut S,
        product_urls: &[Url],
    ) -> RunSummary
    where
        F: PageFetcher + ?Sized,
        S: RecordSink + ?Sized,
    {
        let targets = &product_urls[..product_urls.len().min(self.target_count)];
        let total = targets.len();
        ::log::info!("--- Starting product scraping phase for {} products ---", total);

        let mut summary = RunSummary {
            product_urls_collected: total,
            ..RunSummary::default()
        };

        for (i, url) in targets.iter().enumerate() {
            ::log::info!("Scraping product {}/{}: {}", i + 1, total, url);

            let markup = match fetcher.fetch(url).await {
                Ok(markup) => markup,
                Err(e) => {
                    ::log::error!("Failed to fetch product page {}: {}", url, e);
                    summary.fetch_failures += 1;
                    continue;
                }
            };

            let Some(record) = product::extract(&markup, &self.selectors) else {
                ::log::warn!("Could not parse data for product URL: {}", url);
                summary.parse_failures += 1;
                continue;
            };

            ::log::info!("Parsed: {}", record.display_title());
            match sink.append(&record) {
                Ok(()) => summary.records_written += 1,
                Err(e) => {
                    ::log::error!(
                        "Failed to write product {} from {}: {}",
                        record.display_title(),
                        url,
                        e
                    );
                    summary.write_failures += 1;
                }
            }
        }

        ::log::info!(
            "--- Product scraping finished: {} records written ---",
            summary.records_written
        );
        summary
    }
}
