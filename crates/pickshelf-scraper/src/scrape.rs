//! The scrape pipeline: normalize → fetch → (mobile fallback) → extract → assemble.
//!
//! Strictly sequential, at most three outbound requests per invocation
//! (short-link resolution, primary fetch, mobile fallback). No state survives
//! the call.

use crate::client::PageClient;
use crate::error::ScrapeError;
use crate::extract::extract_fields;
use crate::normalize::{canonical_url, normalize_input};
use crate::text::truncate_chars;
use crate::types::{ExtractedFields, NormalizedInput, ScrapedProduct};

/// Warning attached to degraded results when the marketplace blocked us.
pub const BLOCKED_WARNING: &str = "scraping blocked; returned identifier only";

pub const TITLE_MAX_CHARS: usize = 300;
pub const DESCRIPTION_MAX_CHARS: usize = 800;

/// Scrapes product metadata for a user-supplied ASIN, URL, or short link.
///
/// A blocked page degrades to a minimal record (link + ASIN + warning) after
/// one mobile-site retry; empty extraction results are valid output. The
/// returned `affiliate_link` is the resolved canonical URL — callers that
/// need to preserve the original referral-bearing string must capture it
/// before calling this.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] only for transport-level failures (DNS,
/// refused connection, timeout) on the primary fetch.
pub async fn scrape_product(
    client: &PageClient,
    raw_input: &str,
) -> Result<ScrapedProduct, ScrapeError> {
    let norm = normalize_input(client, raw_input).await;
    let config = client.config();

    tracing::debug!(
        input = raw_input,
        asin = norm.asin.as_deref(),
        url = norm.canonical_url,
        "starting scrape"
    );

    let mut outcome = client
        .fetch_page(&norm.canonical_url, &config.desktop_user_agent)
        .await?;

    if outcome.blocked {
        if let Some(asin) = &norm.asin {
            let mobile_url = canonical_url(&config.mobile_base, asin);
            match client
                .fetch_page(&mobile_url, &config.mobile_user_agent)
                .await
            {
                Ok(fallback) if !fallback.blocked => outcome = fallback,
                Ok(_) => {
                    tracing::info!(asin, "mobile fallback also blocked");
                }
                Err(e) => {
                    // A failed fallback degrades like a blocked one; the
                    // primary outcome still carries the best-known URL.
                    tracing::info!(asin, error = %e, "mobile fallback fetch failed");
                }
            }
        }
    }

    if outcome.blocked {
        return Ok(minimal_result(&norm, &outcome.final_url));
    }

    let fields = extract_fields(&outcome.html);
    Ok(assemble(fields, outcome.final_url, norm.asin))
}

/// Degraded record: identifier and link only, all text fields empty.
fn minimal_result(norm: &NormalizedInput, final_url: &str) -> ScrapedProduct {
    let affiliate_link = if final_url.is_empty() {
        norm.canonical_url.clone()
    } else {
        final_url.to_string()
    };

    ScrapedProduct {
        title: String::new(),
        description: String::new(),
        image_url: String::new(),
        category: None,
        affiliate_link,
        asin: norm.asin.clone(),
        warning: Some(BLOCKED_WARNING.to_string()),
    }
}

fn assemble(fields: ExtractedFields, final_url: String, asin: Option<String>) -> ScrapedProduct {
    ScrapedProduct {
        title: truncate_chars(&fields.title.unwrap_or_default(), TITLE_MAX_CHARS),
        description: truncate_chars(
            &fields.description.unwrap_or_default(),
            DESCRIPTION_MAX_CHARS,
        ),
        image_url: fields.image_url.unwrap_or_default(),
        category: fields.category,
        affiliate_link: final_url,
        asin,
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_truncates_long_title_and_description() {
        let fields = ExtractedFields {
            title: Some("t".repeat(400)),
            description: Some("d".repeat(900)),
            image_url: None,
            category: None,
        };
        let scraped = assemble(fields, "https://example.com/dp/X".to_string(), None);
        assert_eq!(scraped.title.chars().count(), TITLE_MAX_CHARS);
        assert_eq!(scraped.description.chars().count(), DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn assemble_with_nothing_found_yields_empty_fields_not_errors() {
        let scraped = assemble(
            ExtractedFields::default(),
            "https://example.com/foo".to_string(),
            None,
        );
        assert_eq!(scraped.title, "");
        assert_eq!(scraped.description, "");
        assert_eq!(scraped.image_url, "");
        assert_eq!(scraped.category, None);
        assert!(scraped.warning.is_none());
    }

    #[test]
    fn minimal_result_carries_asin_link_and_warning() {
        let norm = NormalizedInput {
            raw_input: "B07XYZ1234".to_string(),
            asin: Some("B07XYZ1234".to_string()),
            canonical_url: "https://www.amazon.co.uk/dp/B07XYZ1234".to_string(),
        };
        let scraped = minimal_result(&norm, "");
        assert_eq!(scraped.affiliate_link, norm.canonical_url);
        assert_eq!(scraped.asin.as_deref(), Some("B07XYZ1234"));
        assert_eq!(scraped.warning.as_deref(), Some(BLOCKED_WARNING));
        assert_eq!(scraped.title, "");
    }
}
