use serde::{Deserialize, Serialize};

/// Outcome of resolving a user-supplied string to a fetchable product URL.
///
/// Invariant: when `asin` is `Some`, `canonical_url` is exactly
/// `{marketplace_base}/dp/{ASIN}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    /// The caller's string, trimmed but otherwise untouched.
    pub raw_input: String,
    /// 10-character uppercase marketplace identifier, when one was found.
    pub asin: Option<String>,
    /// Best-known URL to fetch.
    pub canonical_url: String,
}

/// Raw result of one page fetch.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Non-2xx status or a bot-challenge body.
    pub blocked: bool,
    pub html: String,
    /// URL after redirects; what the response actually came from.
    pub final_url: String,
}

/// Fields pulled out of the product page, each best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// The normalized scrape result handed back to callers.
///
/// Built fresh per request and never mutated afterwards. A degraded scrape
/// (blocked page) carries only the link and ASIN plus a `warning`; "nothing
/// found" is expressed as empty strings, never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapedProduct {
    /// Whitespace-collapsed, at most 300 characters.
    pub title: String,
    /// Whitespace-collapsed, at most 800 characters.
    pub description: String,
    /// Absolute URL of the primary product image, or empty.
    pub image_url: String,
    pub category: Option<String>,
    /// The resolved canonical URL, or the pre-fetch URL when scraping failed.
    pub affiliate_link: String,
    pub asin: Option<String>,
    /// Present only when extraction was degraded by a blocked page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
