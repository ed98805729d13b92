//! PTT forum scraping: board listing pages and article detail pages.

pub mod article;
pub mod listing;

pub use article::{extract_article, ArticleContent};
pub use listing::{
    categorize, extract_stock_id, normalize_push_count, parse_listing, ListingEntry, ListingPage,
};
