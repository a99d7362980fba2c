//! Field extraction from raw product-page HTML.
//!
//! Each field has an ordered list of strategies — pure `&str -> Option<String>`
//! functions tried left to right, first non-empty result wins. Marketplace
//! templates vary by locale and A/B bucket, so no single selector is reliable;
//! the lists go from the most structured signal (Open Graph, JSON-LD) down to
//! raw regex scans. A strategy that fails to match simply yields `None`.

use regex::Regex;
use serde_json::Value;

use crate::text::{clean_fragment, collapse_whitespace, decode_entities};
use crate::types::ExtractedFields;

type Strategy = fn(&str) -> Option<String>;

const TITLE_STRATEGIES: &[Strategy] = &[title_from_meta, title_from_product_span, title_from_tag];

const DESCRIPTION_STRATEGIES: &[Strategy] = &[description_from_meta, description_from_bullets];

const IMAGE_STRATEGIES: &[Strategy] = &[
    image_from_json_ld,
    image_from_meta,
    image_from_dynamic_attr,
    image_from_media_cdn,
];

const CATEGORY_STRATEGIES: &[Strategy] = &[category_from_site_name, category_from_breadcrumb];

/// Runs every field's strategy list over the page.
#[must_use]
pub fn extract_fields(html: &str) -> ExtractedFields {
    ExtractedFields {
        title: first_match(html, TITLE_STRATEGIES),
        description: first_match(html, DESCRIPTION_STRATEGIES),
        image_url: first_match(html, IMAGE_STRATEGIES),
        category: first_match(html, CATEGORY_STRATEGIES),
    }
}

fn first_match(html: &str, strategies: &[Strategy]) -> Option<String> {
    strategies
        .iter()
        .filter_map(|strategy| strategy(html))
        .find(|value| !value.is_empty())
}

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

fn title_from_meta(html: &str) -> Option<String> {
    meta_content(html, "og:title").or_else(|| meta_content(html, "twitter:title"))
}

/// The product-title `<span>` carries one of two known ids depending on the
/// page template.
fn title_from_product_span(html: &str) -> Option<String> {
    for id in ["productTitle", "title"] {
        let re = Regex::new(&format!(
            r#"(?is)<span[^>]+id\s*=\s*["']{id}["'][^>]*>(.*?)</span>"#
        ))
        .expect("valid product title regex");
        if let Some(cap) = re.captures(html) {
            let text = clean_fragment(cap.get(1).map_or("", |m| m.as_str()));
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn title_from_tag(html: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex");
    let cap = re.captures(html)?;
    non_empty(clean_fragment(cap.get(1).map_or("", |m| m.as_str())))
}

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

fn description_from_meta(html: &str) -> Option<String> {
    for name in ["description", "og:description", "twitter:description"] {
        if let Some(text) = meta_content(html, name) {
            return Some(text);
        }
    }
    None
}

/// Flattens the feature-bullets container to plain text.
fn description_from_bullets(html: &str) -> Option<String> {
    let re = Regex::new(r#"(?is)<div[^>]+id\s*=\s*["']feature-bullets["'][^>]*>(.*?)</div>"#)
        .expect("valid feature bullets regex");
    let cap = re.captures(html)?;
    non_empty(clean_fragment(cap.get(1).map_or("", |m| m.as_str())))
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

/// `image` field of the first JSON-LD block that has one: either a bare
/// string or the first element of an array.
fn image_from_json_ld(html: &str) -> Option<String> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid json-ld script regex");

    for cap in script_re.captures_iter(html) {
        let raw = cap.get(1).map_or("", |m| m.as_str()).trim();
        if raw.is_empty() {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            continue;
        };

        let node = match &value {
            Value::Array(items) => items
                .iter()
                .find(|item| item.get("image").is_some() || item.get("name").is_some()),
            _ => Some(&value),
        };

        if let Some(url) = node.and_then(|n| n.get("image")).and_then(json_ld_image_url) {
            return Some(url);
        }
    }
    None
}

fn json_ld_image_url(image: &Value) -> Option<String> {
    match image {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .find(|s| !s.is_empty())
            .map(ToOwned::to_owned),
        _ => None,
    }
}

fn image_from_meta(html: &str) -> Option<String> {
    for name in ["og:image:secure_url", "og:image", "twitter:image"] {
        if let Some(url) = meta_content(html, name) {
            return Some(url);
        }
    }
    None
}

/// The main product image carries a `data-a-dynamic-image` attribute holding
/// a JSON map keyed by candidate image URLs. The first key in document order
/// wins.
fn image_from_dynamic_attr(html: &str) -> Option<String> {
    let patterns = [
        r#"(?is)<img[^>]+id\s*=\s*["']landingImage["'][^>]+data-a-dynamic-image\s*=\s*["']([^"']+)["']"#,
        r#"(?is)<img[^>]+data-a-dynamic-image\s*=\s*["']([^"']+)["'][^>]+id\s*=\s*["']landingImage["']"#,
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid dynamic image regex");
        if let Some(cap) = re.captures(html) {
            let raw = decode_entities(cap.get(1).map_or("", |m| m.as_str()));
            // Pull the first key out of the raw JSON text rather than parsing
            // into a map, which would lose document order.
            let key_re = Regex::new(r#""(https?://[^"\\]+)""#).expect("valid dynamic key regex");
            if let Some(key) = key_re.captures(&raw) {
                return key.get(1).map(|m| m.as_str().to_string());
            }
        }
    }
    None
}

/// Last resort: any image-CDN URL anywhere in the page.
fn image_from_media_cdn(html: &str) -> Option<String> {
    let re = Regex::new(r#"(?i)https://m\.media-amazon\.com/images/[^"'<>()\s]+"#)
        .expect("valid media cdn regex");
    re.find(html).map(|m| decode_entities(m.as_str()))
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

fn category_from_site_name(html: &str) -> Option<String> {
    meta_content(html, "og:site_name")
}

fn category_from_breadcrumb(html: &str) -> Option<String> {
    let patterns = [
        r#"(?is)<li[^>]+class\s*=\s*["'][^"']*breadcrumb[^"']*["'][^>]*>(.*?)</li>"#,
        r#"(?is)<a[^>]+class\s*=\s*["'][^"']*breadcrumb[^"']*["'][^>]*>(.*?)</a>"#,
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid breadcrumb regex");
        if let Some(cap) = re.captures(html) {
            if let Some(text) = non_empty(clean_fragment(cap.get(1).map_or("", |m| m.as_str()))) {
                return Some(text);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Content of a `<meta>` tag matched by `property` or `name`, tolerating
/// either attribute order.
fn meta_content(html: &str, name: &str) -> Option<String> {
    let escaped = regex::escape(name);
    let forward = Regex::new(&format!(
        r#"(?is)<meta[^>]+(?:property|name)\s*=\s*["']{escaped}["'][^>]+content\s*=\s*["']([^"']*)["']"#
    ))
    .expect("valid meta regex");

    if let Some(cap) = forward.captures(html) {
        return non_empty(collapse_whitespace(&decode_entities(
            cap.get(1).map_or("", |m| m.as_str()),
        )));
    }

    let swapped = Regex::new(&format!(
        r#"(?is)<meta[^>]+content\s*=\s*["']([^"']*)["'][^>]+(?:property|name)\s*=\s*["']{escaped}["']"#
    ))
    .expect("valid meta fallback regex");

    swapped.captures(html).and_then(|cap| {
        non_empty(collapse_whitespace(&decode_entities(
            cap.get(1).map_or("", |m| m.as_str()),
        )))
    })
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
