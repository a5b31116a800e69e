use crate::config::CompiledSelectors;
use crate::parsers::product;
use crate::results::ProductRecord;

#[cfg(test)]
mod tests {
    use super::*;

    fn run(markup: &str) -> Option<ProductRecord> {
        product::extract(markup, &CompiledSelectors::default())
    }

    const PRODUCT: &str = r#"
        <html><body>
          <h1 class="product-title">  Studio Headphones DT 770  </h1>
          <div class="price-current"><strong>$199</strong><sup>.99</sup></div>
          <div class="product-seller-sold-by">Sold by: <strong> Audio Shop </strong></div>
          <div class="product-bullets"><ul>
            <li> Closed-back </li>
            <li>80 ohm</li>
          </ul></div>
          <div class="product-rating"><i class="rating" title="4.5 out of 5"></i></div>
          <img class="product-view-img-original" src="https://img.shop.example/dt770.jpg">
        </body></html>
    "#;

    #[test]
    fn test_full_page() {
        let record = run(PRODUCT).unwrap();
        assert_eq!(record.title.as_deref(), Some("Studio Headphones DT 770"));
        assert_eq!(record.price.as_deref(), Some("$199.99"));
        assert_eq!(record.seller.as_deref(), Some("Audio Shop"));
        assert_eq!(record.description.as_deref(), Some("Closed-back\n80 ohm"));
        assert_eq!(record.rating, Some(4.5));
        assert_eq!(
            record.main_image_url.as_deref(),
            Some("https://img.shop.example/dt770.jpg")
        );
    }

    #[test]
    fn test_empty_markup_is_absent() {
        assert_eq!(run(""), None);
        assert_eq!(run("  \n "), None);
    }

    #[test]
    fn test_missing_price_keeps_other_fields() {
        let without_price = PRODUCT.replace(
            r#"<div class="price-current"><strong>$199</strong><sup>.99</sup></div>"#,
            "",
        );
        let record = run(&without_price).unwrap();
        assert_eq!(record.price, None);
        assert_eq!(record.title.as_deref(), Some("Studio Headphones DT 770"));
        assert_eq!(record.seller.as_deref(), Some("Audio Shop"));
        assert_eq!(record.rating, Some(4.5));
    }

    #[test]
    fn test_price_variants() {
        let whole_only = run(r#"<div class="price-current"><strong>$45</strong></div>"#).unwrap();
        assert_eq!(whole_only.price.as_deref(), Some("$45"));

        let empty_container = run(r#"<div class="price-current"><sup>.99</sup></div>"#).unwrap();
        assert_eq!(empty_container.price, None);

        let padded =
            run(r#"<div class="price-current"><strong> $1,299 </strong><sup> .00 </sup></div>"#)
                .unwrap();
        assert_eq!(padded.price.as_deref(), Some("$1,299.00"));
    }

    #[test]
    fn test_price_parts_outside_container_ignored() {
        let record = run(r#"<strong>$5</strong><div class="price-current"></div>"#).unwrap();
        assert_eq!(record.price, None);
    }

    #[test]
    fn test_rating_variants() {
        let rating = |title: &str| {
            let markup = format!(
                r#"<div class="product-rating"><i class="rating" title="{}"></i></div>"#,
                title
            );
            run(&markup).unwrap().rating
        };
        assert_eq!(rating("4.5 out of 5"), Some(4.5));
        assert_eq!(rating("4.5"), Some(4.5));
        assert_eq!(rating("3 out of 5"), Some(3.0));
        assert_eq!(rating("not rated"), None);

        let no_title = run(r#"<div class="product-rating"><i class="rating"></i></div>"#).unwrap();
        assert_eq!(no_title.rating, None);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(product::parse_rating("Rated 4.8 out of 5"), Some(4.8));
        assert_eq!(product::parse_rating(""), None);
    }

    #[test]
    fn test_page_without_fields() {
        let record = run("<html><body><p>Nothing here</p></body></html>").unwrap();
        assert_eq!(record, ProductRecord::default());
    }

    #[test]
    fn test_image_without_src() {
        let record = run(r#"<img class="product-view-img-original">"#).unwrap();
        assert_eq!(record.main_image_url, None);
    }

    #[test]
    fn test_first_match_only() {
        let record = run(
            r#"<h1 class="product-title">First</h1><h1 class="product-title">Second</h1>"#,
        )
        .unwrap();
        assert_eq!(record.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_nested_text_joined_without_inner_trim() {
        let record = run("<h1 class=\"product-title\"> Studio\n  <span>DT 770</span> </h1>").unwrap();
        assert_eq!(record.title.as_deref(), Some("Studio\n  DT 770"));
    }
}
