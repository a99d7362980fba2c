//! Product catalog handlers: list, upsert, approve, archive, delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use pickshelf_core::{slugify, ProductRecord};
use pickshelf_scraper::extract_asin;
use pickshelf_store::{ArchiveState, ProductFilters};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ProductListQuery {
    pub state: Option<String>,
    pub q: Option<String>,
    pub category: Option<String>,
    pub approved: Option<bool>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpsertProductRequest {
    pub product_num: Option<String>,
    pub manufacturer: Option<String>,
    pub my_title: Option<String>,
    pub my_subtitle: Option<String>,
    pub my_description_short: Option<String>,
    pub my_description_long: Option<String>,
    pub amazon_title: Option<String>,
    pub amazon_desc: Option<String>,
    pub amazon_category: Option<String>,
    pub affiliate_link: Option<String>,
    pub image_main: Option<String>,
    pub image_small: Option<String>,
    pub approved: Option<bool>,
    pub added_by: Option<String>,
}

/// GET /api/v1/products — filtered product listing, newest first.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ApiResponse<Vec<ProductRecord>>>, ApiError> {
    let filters = ProductFilters {
        state: query
            .state
            .as_deref()
            .map(ArchiveState::parse)
            .unwrap_or_default(),
        q: query.q,
        category: query.category,
        approved: query.approved,
        limit: query.limit,
    };

    let rows = state
        .store
        .list_products(&filters)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/products/pending — unapproved, unarchived products.
pub(super) async fn list_pending_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ApiResponse<Vec<ProductRecord>>>, ApiError> {
    let rows = state
        .store
        .list_pending_products(query.limit)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/products — create or update a product.
///
/// The natural key is derived when absent: the ASIN found in the affiliate
/// link, lowercased, otherwise a slug of the best available title.
pub(super) async fn upsert_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpsertProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductRecord>>), ApiError> {
    let rid = &req_id.0;

    let product_num = derive_product_num(&body).ok_or_else(|| {
        ApiError::new(
            rid,
            "validation_error",
            "cannot derive a product number: provide product_num, an affiliate_link \
             containing an ASIN, or a title",
        )
    })?;

    let row = ProductRecord {
        product_num,
        manufacturer: body.manufacturer,
        my_title: body.my_title,
        my_subtitle: body.my_subtitle,
        my_description_short: body.my_description_short,
        my_description_long: body.my_description_long,
        amazon_title: body.amazon_title,
        amazon_desc: body.amazon_desc,
        amazon_category: body.amazon_category,
        affiliate_link: body.affiliate_link,
        image_main: body.image_main,
        image_small: body.image_small,
        approved: body.approved.unwrap_or(false),
        added_by: body.added_by,
        archived_at: None,
        created_at: None,
    };

    let stored = state
        .store
        .upsert_product(&row)
        .await
        .map_err(|e| map_store_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: stored,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// POST /api/v1/products/:product_num/approve
pub(super) async fn approve_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_num): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state
        .store
        .set_approved(&product_num, true)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "approved": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/products/:product_num/archive
pub(super) async fn archive_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_num): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    set_archived(&state, req_id, &product_num, true).await
}

/// POST /api/v1/products/:product_num/unarchive
pub(super) async fn unarchive_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_num): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    set_archived(&state, req_id, &product_num, false).await
}

async fn set_archived(
    state: &AppState,
    req_id: RequestId,
    product_num: &str,
    archived: bool,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state
        .store
        .set_archived(product_num, archived)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "archived": archived }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/products/:product_num — permanent removal.
pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_num): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state
        .store
        .delete_product(&product_num)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn derive_product_num(body: &UpsertProductRequest) -> Option<String> {
    if let Some(explicit) = body
        .product_num
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Some(explicit.to_lowercase());
    }

    if let Some(asin) = body.affiliate_link.as_deref().and_then(extract_asin) {
        return Some(asin.to_lowercase());
    }

    let title = body
        .my_title
        .as_deref()
        .or(body.amazon_title.as_deref())
        .unwrap_or_default();
    let slug = slugify(title);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_request() -> UpsertProductRequest {
        UpsertProductRequest {
            product_num: None,
            manufacturer: None,
            my_title: None,
            my_subtitle: None,
            my_description_short: None,
            my_description_long: None,
            amazon_title: None,
            amazon_desc: None,
            amazon_category: None,
            affiliate_link: None,
            image_main: None,
            image_small: None,
            approved: None,
            added_by: None,
        }
    }

    #[test]
    fn explicit_product_num_wins_and_is_lowercased() {
        let body = UpsertProductRequest {
            product_num: Some("  B07XYZ1234 ".to_string()),
            affiliate_link: Some("https://www.amazon.co.uk/dp/B099OTHER1".to_string()),
            ..empty_request()
        };
        assert_eq!(derive_product_num(&body).as_deref(), Some("b07xyz1234"));
    }

    #[test]
    fn asin_in_affiliate_link_is_used_when_no_explicit_key() {
        let body = UpsertProductRequest {
            affiliate_link: Some("https://www.amazon.co.uk/dp/B07XYZ1234?tag=x".to_string()),
            my_title: Some("Steel Kettle".to_string()),
            ..empty_request()
        };
        assert_eq!(derive_product_num(&body).as_deref(), Some("b07xyz1234"));
    }

    #[test]
    fn title_slug_is_the_last_resort() {
        let body = UpsertProductRequest {
            my_title: Some("Fancy Steel Kettle 2L".to_string()),
            ..empty_request()
        };
        assert_eq!(
            derive_product_num(&body).as_deref(),
            Some("fancy-steel-kettle-2l")
        );
    }

    #[test]
    fn nothing_to_key_on_yields_none() {
        assert_eq!(derive_product_num(&empty_request()), None);
        let body = UpsertProductRequest {
            my_title: Some("!!!".to_string()),
            ..empty_request()
        };
        assert_eq!(derive_product_num(&body), None);
    }
}
