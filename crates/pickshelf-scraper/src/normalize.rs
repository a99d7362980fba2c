//! Input normalization: ASIN, short link, or URL in — canonical product URL out.
//!
//! Normalization never fails. The worst case is a passthrough of the caller's
//! string with no ASIN, which the fetcher then attempts as-is.

use regex::Regex;

use crate::client::PageClient;
use crate::config::ScrapeConfig;
use crate::types::NormalizedInput;

/// Extracts an ASIN from a URL or URL-like string.
///
/// Recognized shapes, checked in order: `/dp/<ASIN>`, `/gp/product/<ASIN>`,
/// and an `asin=<ASIN>` query parameter. The result is uppercased.
#[must_use]
pub fn extract_asin(input: &str) -> Option<String> {
    let patterns = [
        r"(?i)/dp/([A-Z0-9]{10})",
        r"(?i)/gp/product/([A-Z0-9]{10})",
        r"(?i)[?&]asin=([A-Z0-9]{10})",
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid asin regex");
        if let Some(cap) = re.captures(input) {
            return cap.get(1).map(|m| m.as_str().to_ascii_uppercase());
        }
    }
    None
}

/// Canonical product URL for an ASIN on the given marketplace base.
#[must_use]
pub fn canonical_url(base: &str, asin: &str) -> String {
    format!("{}/dp/{asin}", base.trim_end_matches('/'))
}

/// Resolves a user-supplied string to a [`NormalizedInput`].
///
/// - Bare 10-character alphanumeric strings are treated as ASINs on the
///   configured marketplace.
/// - Short-link URLs are resolved by following redirects; a failed resolution
///   falls back to the pre-redirect URL rather than erroring.
/// - Marketplace URLs are rewritten to the canonical `/dp/` form, preserving
///   their own host, when an ASIN is present in path or query.
/// - Everything else passes through unchanged, with a last-resort scan for
///   ASIN-bearing path patterns in the raw string.
pub async fn normalize_input(client: &PageClient, raw: &str) -> NormalizedInput {
    let config = client.config();
    let trimmed = raw.trim();

    if is_bare_asin(trimmed) {
        let asin = trimmed.to_ascii_uppercase();
        let canonical = canonical_url(&config.marketplace_base, &asin);
        return NormalizedInput {
            raw_input: trimmed.to_string(),
            asin: Some(asin),
            canonical_url: canonical,
        };
    }

    if let Ok(url) = reqwest::Url::parse(trimmed) {
        if let Some(host) = url.host_str() {
            if config.is_short_link_host(host) {
                let resolved = match client.resolve_redirect(trimmed).await {
                    Ok(final_url) => final_url,
                    Err(e) => {
                        tracing::warn!(
                            url = trimmed,
                            error = %e,
                            "short link resolution failed; keeping pre-redirect URL"
                        );
                        trimmed.to_string()
                    }
                };
                return from_candidate(config, trimmed, &resolved);
            }
        }
    }

    from_candidate(config, trimmed, trimmed)
}

/// Builds the normalized result from a candidate URL (or raw string).
///
/// When an ASIN is found the canonical URL is rebuilt on the candidate's own
/// origin if it has one, so marketplace country domains survive
/// normalization; otherwise the default marketplace base is used.
fn from_candidate(config: &ScrapeConfig, raw: &str, candidate: &str) -> NormalizedInput {
    let Some(asin) = extract_asin(candidate) else {
        return NormalizedInput {
            raw_input: raw.to_string(),
            asin: None,
            canonical_url: candidate.to_string(),
        };
    };

    let base = origin_of(candidate).unwrap_or_else(|| config.marketplace_base.clone());
    let canonical = canonical_url(&base, &asin);
    NormalizedInput {
        raw_input: raw.to_string(),
        asin: Some(asin),
        canonical_url: canonical,
    }
}

fn is_bare_asin(s: &str) -> bool {
    s.len() == 10 && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Scheme + host origin of a URL string, if it parses as one.
fn origin_of(candidate: &str) -> Option<String> {
    let url = reqwest::Url::parse(candidate).ok()?;
    url.host_str()?;
    Some(url.origin().ascii_serialization())
}
