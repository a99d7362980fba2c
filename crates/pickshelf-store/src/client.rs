//! HTTP client for the catalog datastore's REST query interface.
//!
//! The store speaks PostgREST conventions: one endpoint per table under
//! `/rest/v1/`, filters as query parameters (`col=eq.value`, `archived_at=is.null`,
//! `or=(...)`), writes via POST/PATCH/DELETE with `Prefer` headers controlling
//! upsert-merge and returned representations. Every request authenticates with
//! the service key in both the `apikey` and `Authorization` headers.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use pickshelf_core::{CategoryRecord, HomePickRecord, ProductRecord};

use crate::error::StoreError;
use crate::types::{ArchiveState, BackupTable, NewHomePick, ProductFilters};

/// Columns selected for product listings; matches what the admin UI renders.
const PRODUCT_COLUMNS: &str = "product_num,manufacturer,my_title,my_subtitle,my_description_short,\
     my_description_long,amazon_title,amazon_desc,amazon_category,affiliate_link,\
     image_main,image_small,approved,added_by,archived_at,created_at";

/// Columns selected for home-pick rows.
const PICK_COLUMNS: &str =
    "product_num,my_title,amazon_title,my_description_short,image_main,created_at";

const DEFAULT_LIST_LIMIT: u32 = 100;
const MAX_LIST_LIMIT: u32 = 200;

/// Client for the catalog store's REST interface.
///
/// Use [`StoreClient::new`] with the production base URL, or point it at a
/// mock server in tests.
#[derive(Debug)]
pub struct StoreClient {
    client: Client,
    base_url: Url,
    service_key: String,
}

impl StoreClient {
    /// Creates a client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`StoreError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(base_url: &str, service_key: &str, timeout_secs: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pickshelf/0.1 (catalog-admin)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends path segments rather than replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| StoreError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            service_key: service_key.to_owned(),
        })
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    /// Lists products matching `filters`, newest first.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`], [`StoreError::UnexpectedStatus`], or
    /// [`StoreError::Deserialize`].
    pub async fn list_products(
        &self,
        filters: &ProductFilters,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let mut url = self.table_url("products");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", PRODUCT_COLUMNS);
            pairs.append_pair("order", "created_at.desc");
            pairs.append_pair("limit", &clamp_limit(filters.limit).to_string());

            match filters.state {
                ArchiveState::Active => {
                    pairs.append_pair("archived_at", "is.null");
                }
                ArchiveState::Archived => {
                    pairs.append_pair("archived_at", "not.is.null");
                }
                ArchiveState::All => {}
            }

            if let Some(q) = filters.q.as_deref().filter(|q| !q.trim().is_empty()) {
                pairs.append_pair("or", &search_disjunction(q.trim()));
            }
            if let Some(category) = filters.category.as_deref() {
                pairs.append_pair("amazon_category", &format!("eq.{category}"));
            }
            if let Some(approved) = filters.approved {
                pairs.append_pair("approved", &format!("eq.{approved}"));
            }
        }

        let response = self.request(Method::GET, url.clone()).send().await?;
        let response = expect_2xx(response).await?;
        parse_json(response, "product list").await
    }

    /// Lists products awaiting approval: unapproved and not archived.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::list_products`].
    pub async fn list_pending_products(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        self.list_products(&ProductFilters {
            state: ArchiveState::Active,
            approved: Some(false),
            limit,
            ..ProductFilters::default()
        })
        .await
    }

    /// The sampling pool for a picks refresh: approved products with an
    /// image, newest first, up to `limit`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`], [`StoreError::UnexpectedStatus`], or
    /// [`StoreError::Deserialize`].
    pub async fn list_pick_pool(&self, limit: u32) -> Result<Vec<ProductRecord>, StoreError> {
        let mut url = self.table_url("products");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", PRODUCT_COLUMNS);
            pairs.append_pair("approved", "eq.true");
            pairs.append_pair("product_num", "not.is.null");
            pairs.append_pair("image_main", "not.is.null");
            pairs.append_pair("order", "created_at.desc");
            pairs.append_pair("limit", &limit.to_string());
        }

        let response = self.request(Method::GET, url).send().await?;
        let response = expect_2xx(response).await?;
        parse_json(response, "pick pool").await
    }

    /// Upserts a product keyed on `product_num` and returns the stored row.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`], [`StoreError::UnexpectedStatus`],
    /// [`StoreError::Deserialize`], or [`StoreError::MissingRow`] if the
    /// store returns an empty representation.
    pub async fn upsert_product(&self, row: &ProductRecord) -> Result<ProductRecord, StoreError> {
        let mut url = self.table_url("products");
        url.query_pairs_mut()
            .append_pair("on_conflict", "product_num");

        let response = self
            .request(Method::POST, url)
            .header(
                "Prefer",
                "resolution=merge-duplicates,return=representation",
            )
            .json(&[row])
            .send()
            .await?;
        let response = expect_2xx(response).await?;

        let rows: Vec<ProductRecord> =
            parse_json(response, &format!("upsert of {}", row.product_num)).await?;
        rows.into_iter().next().ok_or_else(|| StoreError::MissingRow {
            context: format!("upsert of {}", row.product_num),
        })
    }

    /// Sets the approval flag on a product.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] or [`StoreError::UnexpectedStatus`].
    pub async fn set_approved(&self, product_num: &str, approved: bool) -> Result<(), StoreError> {
        self.patch_product(product_num, &serde_json::json!({ "approved": approved }))
            .await
    }

    /// Archives or un-archives a product by setting or clearing `archived_at`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] or [`StoreError::UnexpectedStatus`].
    pub async fn set_archived(&self, product_num: &str, archived: bool) -> Result<(), StoreError> {
        let body = if archived {
            serde_json::json!({ "archived_at": Utc::now() })
        } else {
            serde_json::json!({ "archived_at": null })
        };
        self.patch_product(product_num, &body).await
    }

    /// Permanently deletes a product row.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] or [`StoreError::UnexpectedStatus`].
    pub async fn delete_product(&self, product_num: &str) -> Result<(), StoreError> {
        let mut url = self.table_url("products");
        url.query_pairs_mut()
            .append_pair("product_num", &format!("eq.{product_num}"));

        let response = self.request(Method::DELETE, url).send().await?;
        expect_2xx(response).await?;
        Ok(())
    }

    async fn patch_product(
        &self,
        product_num: &str,
        body: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut url = self.table_url("products");
        url.query_pairs_mut()
            .append_pair("product_num", &format!("eq.{product_num}"));

        let response = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        expect_2xx(response).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    /// Lists all categories, alphabetical.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`], [`StoreError::UnexpectedStatus`], or
    /// [`StoreError::Deserialize`].
    pub async fn list_categories(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        let mut url = self.table_url("categories");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "id,name,slug");
            pairs.append_pair("order", "name.asc");
        }

        let response = self.request(Method::GET, url).send().await?;
        let response = expect_2xx(response).await?;
        parse_json(response, "category list").await
    }

    /// Creates a category and returns the stored row.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`], [`StoreError::UnexpectedStatus`],
    /// [`StoreError::Deserialize`], or [`StoreError::MissingRow`].
    pub async fn create_category(
        &self,
        name: &str,
        slug: &str,
    ) -> Result<CategoryRecord, StoreError> {
        let url = self.table_url("categories");
        let response = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&serde_json::json!([{ "name": name, "slug": slug }]))
            .send()
            .await?;
        let response = expect_2xx(response).await?;

        let rows: Vec<CategoryRecord> =
            parse_json(response, &format!("create category \"{name}\"")).await?;
        rows.into_iter().next().ok_or_else(|| StoreError::MissingRow {
            context: format!("create category \"{name}\""),
        })
    }

    /// Renames a category.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] or [`StoreError::UnexpectedStatus`].
    pub async fn rename_category(&self, id: i64, name: &str) -> Result<(), StoreError> {
        let mut url = self.table_url("categories");
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));

        let response = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        expect_2xx(response).await?;
        Ok(())
    }

    /// Deletes a category row. Product reassignment is the caller's business;
    /// see [`StoreClient::reassign_category`].
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] or [`StoreError::UnexpectedStatus`].
    pub async fn delete_category(&self, id: i64) -> Result<(), StoreError> {
        let mut url = self.table_url("categories");
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));

        let response = self.request(Method::DELETE, url).send().await?;
        expect_2xx(response).await?;
        Ok(())
    }

    /// Moves every product in category `from` to category `to`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] or [`StoreError::UnexpectedStatus`].
    pub async fn reassign_category(&self, from: &str, to: Option<&str>) -> Result<(), StoreError> {
        let mut url = self.table_url("products");
        url.query_pairs_mut()
            .append_pair("amazon_category", &format!("eq.{from}"));

        let response = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "amazon_category": to }))
            .send()
            .await?;
        expect_2xx(response).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Home picks
    // -----------------------------------------------------------------------

    /// Current home-page rotation, newest first.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`], [`StoreError::UnexpectedStatus`], or
    /// [`StoreError::Deserialize`].
    pub async fn list_home_picks(&self, limit: u32) -> Result<Vec<HomePickRecord>, StoreError> {
        let mut url = self.table_url("shop_products");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", PICK_COLUMNS);
            pairs.append_pair("order", "created_at.desc");
            pairs.append_pair("limit", &limit.to_string());
        }

        let response = self.request(Method::GET, url).send().await?;
        let response = expect_2xx(response).await?;
        parse_json(response, "home picks").await
    }

    /// Empties the picks table ahead of a refresh.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] or [`StoreError::UnexpectedStatus`].
    pub async fn clear_home_picks(&self) -> Result<(), StoreError> {
        let mut url = self.table_url("shop_products");
        // PostgREST refuses an unfiltered DELETE; this matches every row.
        url.query_pairs_mut()
            .append_pair("product_num", "not.is.null");

        let response = self.request(Method::DELETE, url).send().await?;
        expect_2xx(response).await?;
        Ok(())
    }

    /// Inserts a fresh rotation and returns how many rows the store stored.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`], [`StoreError::UnexpectedStatus`], or
    /// [`StoreError::Deserialize`].
    pub async fn insert_home_picks(&self, picks: &[NewHomePick]) -> Result<usize, StoreError> {
        if picks.is_empty() {
            return Ok(0);
        }

        let url = self.table_url("shop_products");
        let response = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(picks)
            .send()
            .await?;
        let response = expect_2xx(response).await?;

        let rows: Vec<serde_json::Value> = parse_json(response, "insert home picks").await?;
        Ok(rows.len())
    }

    // -----------------------------------------------------------------------
    // Backup / health
    // -----------------------------------------------------------------------

    /// Dumps every row of an allow-listed table as raw JSON.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`], [`StoreError::UnexpectedStatus`], or
    /// [`StoreError::Deserialize`].
    pub async fn export_table(
        &self,
        table: BackupTable,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let mut url = self.table_url(table.as_str());
        url.query_pairs_mut().append_pair("select", "*");

        let response = self.request(Method::GET, url).send().await?;
        let response = expect_2xx(response).await?;
        parse_json(response, &format!("export of {}", table.as_str())).await
    }

    /// Cheap reachability probe used by the health endpoint.
    ///
    /// # Errors
    ///
    /// [`StoreError::Http`] or [`StoreError::UnexpectedStatus`].
    pub async fn health_check(&self) -> Result<(), StoreError> {
        let mut url = self.table_url("products");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "product_num");
            pairs.append_pair("limit", "1");
        }

        let response = self.request(Method::GET, url).send().await?;
        expect_2xx(response).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn table_url(&self, table: &str) -> Url {
        // base_url is normalised to end with '/', so join never fails for the
        // fixed table names used here.
        self.base_url
            .join(&format!("rest/v1/{table}"))
            .unwrap_or_else(|_| self.base_url.clone())
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

/// PostgREST `or=(...)` disjunction for free-text product search.
fn search_disjunction(q: &str) -> String {
    let term = format!("*{q}*");
    let clauses = [
        "my_title",
        "amazon_title",
        "amazon_category",
        "product_num",
        "my_description_short",
        "amazon_desc",
    ]
    .map(|col| format!("{col}.ilike.{term}"));
    format!("({})", clauses.join(","))
}

fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

async fn expect_2xx(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), url, "store request failed");
    Err(StoreError::UnexpectedStatus {
        status: status.as_u16(),
        url,
        body: excerpt(&body),
    })
}

async fn parse_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, StoreError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// First 300 bytes of a body, on a char boundary, for error messages.
fn excerpt(body: &str) -> String {
    const MAX: usize = 300;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
