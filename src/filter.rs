use url::Url;

/// Decides which hrefs on a listing page are product detail pages
#[derive(Debug, Clone)]
pub struct ProductUrlFilter {
    detail_path_marker: String,
}

impl Default for ProductUrlFilter {
    fn default() -> Self {
        Self::new("/p/")
    }
}

impl ProductUrlFilter {
    /// Create a filter admitting URLs whose path contains `detail_path_marker`
    pub fn new(detail_path_marker: &str) -> Self {
        Self {
            detail_path_marker: detail_path_marker.to_string(),
        }
    }

    /// Resolve an href against the page it was found on
    ///
    /// Returns `None` for `javascript:` hrefs and hrefs that cannot be joined.
    pub fn resolve(&self, base_url: &Url, href: &str) -> Option<Url> {
        if is_script_href(href) {
            ::log::trace!("Skipping script href: {}", href);
            return None;
        }
        match base_url.join(href.trim()) {
            Ok(resolved) => Some(self.normalize_url(&resolved)),
            Err(e) => {
                ::log::debug!("Could not resolve href {:?} against {}: {}", href, base_url, e);
                None
            }
        }
    }

    /// Resolve an href and keep it only if it points at a detail page
    pub fn admit(&self, base_url: &Url, href: &str) -> Option<Url> {
        self.resolve(base_url, href)
            .filter(|url| self.is_product_url(url))
    }

    /// Check if a URL's path carries the detail-page marker
    pub fn is_product_url(&self, url: &Url) -> bool {
        url.path().contains(&self.detail_path_marker)
    }

    /// Create a normalized version of the URL (e.g., removing fragments)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}

/// True for `javascript:` pseudo-URLs, in any letter case
pub fn is_script_href(href: &str) -> bool {
    href.trim_start()
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://shop.example/Headphones/SubCategory/ID-70?PageSize=96").unwrap()
    }

    #[test]
    fn test_script_hrefs_rejected() {
        assert!(is_script_href("javascript:void(0)"));
        assert!(is_script_href("  JavaScript:openCart()"));
        assert!(!is_script_href("/p/abc"));
        assert!(!is_script_href("java"));

        let filter = ProductUrlFilter::default();
        assert_eq!(filter.resolve(&base(), "javascript:void(0)"), None);
    }

    #[test]
    fn test_resolution_forms() {
        let filter = ProductUrlFilter::default();

        let relative = filter.resolve(&base(), "../p/abc").unwrap();
        assert_eq!(relative.as_str(), "https://shop.example/Headphones/p/abc");

        let rooted = filter.resolve(&base(), "/p/abc").unwrap();
        assert_eq!(rooted.as_str(), "https://shop.example/p/abc");

        let protocol_relative = filter.resolve(&base(), "//cdn.shop.example/p/x").unwrap();
        assert_eq!(protocol_relative.as_str(), "https://cdn.shop.example/p/x");

        let query_only = filter.resolve(&base(), "?page=2").unwrap();
        assert_eq!(
            query_only.as_str(),
            "https://shop.example/Headphones/SubCategory/ID-70?page=2"
        );

        let absolute = filter.resolve(&base(), "http://other.example/p/1").unwrap();
        assert_eq!(absolute.as_str(), "http://other.example/p/1");
    }

    #[test]
    fn test_admit_requires_marker() {
        let filter = ProductUrlFilter::default();
        assert!(filter.admit(&base(), "/p/abc").is_some());
        assert!(filter.admit(&base(), "/cat/other").is_none());
        // Marker must be in the path, not the query
        assert!(filter.admit(&base(), "/search?q=/p/abc").is_none());
    }

    #[test]
    fn test_normalization_drops_fragment() {
        let filter = ProductUrlFilter::default();
        let a = filter.admit(&base(), "/p/abc#reviews").unwrap();
        let b = filter.admit(&base(), "HTTPS://SHOP.EXAMPLE:443/p/abc").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "https://shop.example/p/abc");
    }

    #[test]
    fn test_custom_marker() {
        let filter = ProductUrlFilter::new("/item/");
        assert!(filter.admit(&base(), "/item/42").is_some());
        assert!(filter.admit(&base(), "/p/42").is_none());
    }
}
