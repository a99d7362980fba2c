//! Shared catalog record shapes, mirroring the datastore's `products`,
//! `categories`, and `shop_products` tables.
//!
//! All fields except the natural keys are optional: the REST interface
//! returns `null` for unset columns and partial selections omit columns
//! entirely, so deserialization has to tolerate both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the `products` table.
///
/// `product_num` is the natural key — the lowercased ASIN when one is known,
/// otherwise a slug derived from the title.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_num: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_description_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_description_long: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_small: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One row of the `categories` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// One row of the `shop_products` table: the current home-page rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePickRecord {
    pub product_num: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_description_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Lowercase-ASCII slug of a title, for synthesizing a `product_num` when no
/// ASIN can be recovered from the submitted fields.
///
/// Runs of non-alphanumeric characters collapse to a single `-`; leading and
/// trailing separators are dropped.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_sep = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}
