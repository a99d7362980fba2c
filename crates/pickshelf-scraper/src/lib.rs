pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod scrape;
pub mod text;
pub mod types;

pub use client::PageClient;
pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use normalize::{extract_asin, normalize_input};
pub use scrape::{scrape_product, BLOCKED_WARNING};
pub use types::{FetchOutcome, NormalizedInput, ScrapedProduct};
