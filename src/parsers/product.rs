use crate::config::CompiledSelectors;
use crate::parsers::{parse_document, trimmed_text};
use crate::results::ProductRecord;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// Leading number of a rating title such as "4.5 out of 5"
static RATING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d*\.?\d+)(?:\s*out of 5)?").expect("valid rating regex"));

/// Extracts product fields from a detail page
///
/// Returns `None` only when there is no markup. A page that parses always
/// yields a record; fields whose selectors miss are left as `None`.
pub fn extract(markup: &str, selectors: &CompiledSelectors) -> Option<ProductRecord> {
    let Some(doc) = parse_document(markup) else {
        ::log::debug!("No markup provided to the product extractor");
        return None;
    };

    let record = ProductRecord {
        title: first_text(&doc, &selectors.title),
        description: description(&doc, selectors),
        price: price(&doc, selectors),
        rating: rating(&doc, selectors),
        seller: first_text(&doc, &selectors.seller),
        main_image_url: doc
            .select(&selectors.image)
            .next()
            .and_then(|e| e.value().attr("src"))
            .map(str::to_string),
    };

    log_missing_fields(&record);
    Some(record)
}

fn first_text(doc: &Html, selector: &scraper::Selector) -> Option<String> {
    doc.select(selector).next().map(trimmed_text)
}

/// Whole units and fractional units joined without a separator
fn price(doc: &Html, selectors: &CompiledSelectors) -> Option<String> {
    let container = doc.select(&selectors.price).next()?;
    let whole = container.select(&selectors.price_whole).next().map(trimmed_text)?;

    match container.select(&selectors.price_fraction).next() {
        Some(fraction) => Some(format!("{}{}", whole, trimmed_text(fraction))),
        None => Some(whole),
    }
}

fn description(doc: &Html, selectors: &CompiledSelectors) -> Option<String> {
    let bullets: Vec<String> = doc
        .select(&selectors.description_bullets)
        .map(trimmed_text)
        .collect();

    if bullets.is_empty() {
        None
    } else {
        Some(bullets.join("\n"))
    }
}

fn rating(doc: &Html, selectors: &CompiledSelectors) -> Option<f64> {
    let title = doc.select(&selectors.rating).next()?.value().attr("title")?;
    parse_rating(title)
}

/// Parses the leading number of a rating title; the "out of 5" suffix is optional
pub fn parse_rating(text: &str) -> Option<f64> {
    RATING_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn log_missing_fields(record: &ProductRecord) {
    let fields = [
        ("title", record.title.is_none()),
        ("description", record.description.is_none()),
        ("price", record.price.is_none()),
        ("rating", record.rating.is_none()),
        ("seller", record.seller.is_none()),
        ("main_image_url", record.main_image_url.is_none()),
    ];
    for (field, missing) in fields {
        if missing {
            ::log::debug!("Field {} not found for product {}", field, record.display_title());
        }
    }
}
