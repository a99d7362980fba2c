//! Scrape pipeline configuration.
//!
//! Everything the pipeline needs to know about the outside world lives here:
//! marketplace and mobile-site base URLs, short-link hosts, user agents, and
//! the per-attempt timeout. Tests point the bases at a mock server, making
//! the whole pipeline deterministic.

use pickshelf_core::AppConfig;

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Scheme + host of the marketplace, e.g. `https://www.amazon.co.uk`.
    /// Canonical product URLs are `{marketplace_base}/dp/{ASIN}`.
    pub marketplace_base: String,
    /// Scheme + host of the mobile storefront used for the blocked-page fallback.
    pub mobile_base: String,
    /// Hostnames treated as redirect short links and resolved before fetching.
    pub short_link_hosts: Vec<String>,
    pub desktop_user_agent: String,
    pub mobile_user_agent: String,
    /// Deadline per fetch attempt; without one a stalled upstream hangs the
    /// whole request.
    pub timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            marketplace_base: "https://www.amazon.co.uk".to_string(),
            mobile_base: "https://m.amazon.co.uk".to_string(),
            short_link_hosts: vec!["amzn.to".to_string(), "amzn.eu".to_string()],
            desktop_user_agent: pickshelf_core::DEFAULT_DESKTOP_USER_AGENT.to_string(),
            mobile_user_agent: pickshelf_core::DEFAULT_MOBILE_USER_AGENT.to_string(),
            timeout_secs: 20,
        }
    }
}

impl ScrapeConfig {
    /// Builds the scrape config from the application config, keeping the
    /// default short-link hosts.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            marketplace_base: config.marketplace_base.clone(),
            mobile_base: config.mobile_base.clone(),
            desktop_user_agent: config.scrape_desktop_user_agent.clone(),
            mobile_user_agent: config.scrape_mobile_user_agent.clone(),
            timeout_secs: config.scrape_timeout_secs,
            ..Self::default()
        }
    }

    /// True when `host` is one of the configured short-link domains.
    #[must_use]
    pub fn is_short_link_host(&self, host: &str) -> bool {
        self.short_link_hosts
            .iter()
            .any(|h| h.eq_ignore_ascii_case(host))
    }
}
