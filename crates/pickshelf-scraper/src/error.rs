use thiserror::Error;

/// Errors surfaced by the scrape pipeline.
///
/// Only transport-level failures escape: blocked pages degrade to a minimal
/// result and extraction misses are silently absent. See
/// [`crate::scrape::scrape_product`].
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
