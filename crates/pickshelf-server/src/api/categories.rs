//! Category handlers. Deleting a category can reassign its products first so
//! no product row is left pointing at a name that no longer exists.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use pickshelf_core::{slugify, CategoryRecord};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RenameCategoryRequest {
    pub name: String,
    /// The category's current name; when given, products carrying it move to
    /// the new name. Products reference categories by name, not id.
    pub previous_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DeleteCategoryQuery {
    /// Current name of the category being deleted; required to move its
    /// products.
    pub name: Option<String>,
    /// Category name the products move to. Absent means products keep no
    /// category.
    pub reassign_to: Option<String>,
}

/// GET /api/v1/categories
pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CategoryRecord>>>, ApiError> {
    let rows = state
        .store
        .list_categories()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/categories
pub(super) async fn create_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryRecord>>), ApiError> {
    let rid = &req_id.0;

    let name = body.name.trim().to_owned();
    if name.is_empty() || name.len() > 100 {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "name must be 1–100 characters",
        ));
    }

    let slug = slugify(&name);
    let row = state
        .store
        .create_category(&name, &slug)
        .await
        .map_err(|e| map_store_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: row,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PATCH /api/v1/categories/:id
pub(super) async fn rename_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<RenameCategoryRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;

    let name = body.name.trim();
    if name.is_empty() || name.len() > 100 {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "name must be 1–100 characters",
        ));
    }

    state
        .store
        .rename_category(id, name)
        .await
        .map_err(|e| map_store_error(rid.clone(), &e))?;

    if let Some(previous) = body
        .previous_name
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty() && *p != name)
    {
        state
            .store
            .reassign_category(previous, Some(name))
            .await
            .map_err(|e| map_store_error(rid.clone(), &e))?;
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "renamed": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/categories/:id?name=...&reassign_to=...
pub(super) async fn delete_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteCategoryQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;

    if let Some(name) = query.name.as_deref().filter(|n| !n.trim().is_empty()) {
        state
            .store
            .reassign_category(name.trim(), query.reassign_to.as_deref())
            .await
            .map_err(|e| map_store_error(rid.clone(), &e))?;
    }

    state
        .store
        .delete_category(id)
        .await
        .map_err(|e| map_store_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pickshelf_scraper::{PageClient, ScrapeConfig};
    use pickshelf_store::StoreClient;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::{build_app, default_rate_limit_state, AppState};
    use crate::middleware::AuthState;

    fn app_with_store(store_uri: &str) -> axum::Router {
        let store = StoreClient::new(store_uri, "test-key", 5).expect("store");
        let scraper = PageClient::new(ScrapeConfig::default()).expect("scraper");
        build_app(
            AppState {
                store: Arc::new(store),
                scraper: Arc::new(scraper),
                home_pick_count: 6,
                home_pick_pool_limit: 200,
            },
            AuthState::for_tests(vec![], false),
            default_rate_limit_state(),
        )
    }

    #[tokio::test]
    async fn create_category_rejects_blank_name() {
        let store = MockServer::start().await;
        let app = app_with_store(&store.uri());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/categories")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "name": "   " }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn create_category_slugs_the_name() {
        let store = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/categories"))
            .respond_with(ResponseTemplate::new(201).set_body_json(&json!([
                {"id": 7, "name": "Garden Tools", "slug": "garden-tools"}
            ])))
            .expect(1)
            .mount(&store)
            .await;

        let app = app_with_store(&store.uri());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/categories")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "name": " Garden Tools " }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["data"]["slug"], "garden-tools");
    }

    #[tokio::test]
    async fn delete_with_name_reassigns_products_first() {
        let store = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/products"))
            .and(query_param("amazon_category", "eq.Garden"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&store)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/categories"))
            .and(query_param("id", "eq.7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&store)
            .await;

        let app = app_with_store(&store.uri());
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/categories/7?name=Garden&reassign_to=Kitchen")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
