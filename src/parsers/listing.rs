use crate::config::CompiledSelectors;
use crate::filter::ProductUrlFilter;
use crate::parsers::parse_document;
use std::collections::HashSet;
use url::Url;

/// Links found on one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingLinks {
    /// Product detail URLs, deduplicated, in document order
    pub product_urls: Vec<Url>,
    /// Next listing page, absent on the last page
    pub next_page: Option<Url>,
}

/// Extracts product links and the next-page link from a listing page
///
/// Relative hrefs are resolved against `base_url`, the URL the listing was
/// fetched from. Empty markup yields no links and no next page.
pub fn extract(
    markup: &str,
    base_url: &Url,
    selectors: &CompiledSelectors,
    filter: &ProductUrlFilter,
) -> ListingLinks {
    let Some(doc) = parse_document(markup) else {
        ::log::debug!("No markup to extract links from for {}", base_url);
        return ListingLinks::default();
    };

    let mut seen = HashSet::new();
    let mut product_urls = Vec::new();
    let mut candidates = 0;

    for href in doc
        .select(&selectors.product_link)
        .filter_map(|e| e.value().attr("href"))
    {
        candidates += 1;
        if let Some(url) = filter.admit(base_url, href) {
            if seen.insert(url.as_str().to_string()) {
                product_urls.push(url);
            }
        }
    }

    let next_page = doc
        .select(&selectors.next_page)
        .next()
        .and_then(|e| e.value().attr("href"))
        .and_then(|href| filter.resolve(base_url, href));

    ::log::debug!(
        "Extracted {} product URLs from {} candidate links. Next page: {:?}",
        product_urls.len(),
        candidates,
        next_page.as_ref().map(Url::as_str)
    );

    ListingLinks {
        product_urls,
        next_page,
    }
}
