pub mod listing;
pub mod product;

#[cfg(test)]
mod tests;

use scraper::{ElementRef, Html};

/// Parses markup into a document, or `None` when there is nothing to parse
pub fn parse_document(markup: &str) -> Option<Html> {
    if markup.trim().is_empty() {
        return None;
    }
    Some(Html::parse_document(markup))
}

/// Text content of an element with surrounding whitespace removed
pub fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
