/// Fields extracted from one product detail page
///
/// `None` marks a field that was not found on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    pub title: Option<String>,
    /// Bullet points joined with newlines
    pub description: Option<String>,
    /// Price text as displayed, e.g. "$199.99"
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub seller: Option<String>,
    pub main_image_url: Option<String>,
}

/// Output columns a record can be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ProductTitle,
    ProductDescription,
    ProductPrice,
    ProductRating,
    SellerName,
    MainImageUrl,
}

impl Column {
    /// Every column, in the default output order
    pub const ALL: [Column; 6] = [
        Column::ProductTitle,
        Column::ProductDescription,
        Column::ProductPrice,
        Column::ProductRating,
        Column::SellerName,
        Column::MainImageUrl,
    ];

    /// Header name used in the output file
    pub fn name(&self) -> &'static str {
        match self {
            Column::ProductTitle => "product_title",
            Column::ProductDescription => "product_description",
            Column::ProductPrice => "product_price",
            Column::ProductRating => "product_rating",
            Column::SellerName => "seller_name",
            Column::MainImageUrl => "main_image_url",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl ProductRecord {
    /// The record's value for a column, rendered as text
    pub fn value(&self, column: Column) -> Option<String> {
        match column {
            Column::ProductTitle => self.title.clone(),
            Column::ProductDescription => self.description.clone(),
            Column::ProductPrice => self.price.clone(),
            // Debug keeps the fractional part of whole ratings ("5.0")
            Column::ProductRating => self.rating.map(|r| format!("{:?}", r)),
            Column::SellerName => self.seller.clone(),
            Column::MainImageUrl => self.main_image_url.clone(),
        }
    }

    /// Title for log lines
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("N/A")
    }
}

/// Why listing traversal stopped; every variant is a normal end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStop {
    TargetReached,
    NoNextPage,
    FetchFailed,
    CycleDetected,
}

/// Totals reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `None` when only the product phase ran
    pub phase_one_end: Option<ListingStop>,
    pub listing_pages_visited: usize,
    pub product_urls_collected: usize,
    pub records_written: usize,
    pub fetch_failures: usize,
    pub parse_failures: usize,
    pub write_failures: usize,
}
