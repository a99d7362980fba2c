//! Text cleanup shared by the extraction strategies.

use regex::Regex;

/// Decodes the HTML entities that actually occur in product-page metadata.
///
/// `&amp;` is decoded first, matching how the page encodes nested entities.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    input
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Replaces every HTML tag with a space so adjacent text nodes stay separated.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    let tags = Regex::new(r"(?is)<[^>]*>").expect("valid tags regex");
    tags.replace_all(input, " ").into_owned()
}

/// Collapses runs of whitespace to single spaces and trims the ends.
#[must_use]
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip tags, decode entities, collapse whitespace. The standard treatment
/// for any text pulled out of raw HTML.
#[must_use]
pub fn clean_fragment(input: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_tags(input)))
}

/// Truncates to at most `max_chars` characters (not bytes), so multi-byte
/// text never splits mid-character.
#[must_use]
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    input.chars().take(max_chars).collect()
}
