//! HTTP client for product-page fetches and short-link resolution.

use std::time::Duration;

use reqwest::Client;

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::types::FetchOutcome;

/// Case-insensitive body substrings that mark an anti-bot challenge page.
const BLOCK_MARKERS: &[&str] = &[
    "captcha",
    "robot check",
    "automated access",
    "enter the characters",
];

/// Client for fetching marketplace product pages.
///
/// Sends browser-like headers, follows redirects, and enforces a per-attempt
/// timeout from [`ScrapeConfig`]. A fetch is classified as blocked on any
/// non-2xx status or a body matching [`is_blocked`]; blocked is a degraded
/// outcome, not an error.
pub struct PageClient {
    http: Client,
    config: ScrapeConfig,
}

impl PageClient {
    /// Creates a client with the configured timeout. Redirects are followed
    /// with reqwest's default policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(config: ScrapeConfig) -> Result<Self, ScrapeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Fetches `url` with the given user agent and classifies the result.
    ///
    /// Sends `Accept`, `Accept-Language`, and `Cache-Control: no-cache`
    /// headers shaped like an ordinary browser request. The body is read
    /// even on non-2xx responses: challenge pages come back as 503 with
    /// HTML worth classifying.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] on network failure, timeout, or a body
    /// read error. Non-2xx statuses are NOT errors; they mark the outcome
    /// blocked.
    pub async fn fetch_page(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<FetchOutcome, ScrapeError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-GB,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().to_string();
        let html = response.text().await?;
        let blocked = !status.is_success() || is_blocked(&html);

        if blocked {
            tracing::debug!(url, status = status.as_u16(), "fetch classified as blocked");
        }

        Ok(FetchOutcome {
            blocked,
            html,
            final_url,
        })
    }

    /// Follows redirects from `url` and returns the final resolved URL.
    ///
    /// Used for short-link resolution before the real fetch; the body is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] on network failure or timeout. Callers
    /// treat this as "could not resolve" and keep the pre-redirect URL.
    pub async fn resolve_redirect(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .http
            .get(url)
            .header(
                reqwest::header::USER_AGENT,
                &self.config.desktop_user_agent,
            )
            .send()
            .await?;
        Ok(response.url().to_string())
    }
}

/// True when the body looks like an anti-bot challenge rather than a
/// product page.
#[must_use]
pub fn is_blocked(html: &str) -> bool {
    let lower = html.to_lowercase();
    BLOCK_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_blocked_matches_markers_case_insensitively() {
        assert!(is_blocked("<html>Robot Check</html>"));
        assert!(is_blocked("please solve this CAPTCHA to continue"));
        assert!(is_blocked("Enter the characters you see below"));
        assert!(is_blocked("automated access to this site is forbidden"));
    }

    #[test]
    fn is_blocked_ignores_ordinary_product_pages() {
        assert!(!is_blocked(
            "<html><head><title>Fancy Kettle</title></head></html>"
        ));
    }
}
