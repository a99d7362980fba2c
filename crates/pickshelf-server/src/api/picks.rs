//! Home-page picks: the small random rotation of approved products shown on
//! the shop front page.

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use pickshelf_core::HomePickRecord;
use pickshelf_store::NewHomePick;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RefreshResult {
    pub inserted: usize,
    pub product_nums: Vec<String>,
}

/// GET /api/v1/home-picks — the current rotation, public.
pub(super) async fn list_home_picks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<HomePickRecord>>>, ApiError> {
    let limit = u32::try_from(state.home_pick_count).unwrap_or(u32::MAX);
    let rows = state
        .store
        .list_home_picks(limit)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/home-picks/refresh — replace the rotation with a fresh
/// random sample of approved products.
///
/// An undersized pool is not an error: the new rotation is simply smaller.
pub(super) async fn refresh_home_picks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RefreshResult>>, ApiError> {
    let rid = &req_id.0;

    let pool = state
        .store
        .list_pick_pool(state.home_pick_pool_limit)
        .await
        .map_err(|e| map_store_error(rid.clone(), &e))?;

    let product_nums: Vec<String> = pool
        .choose_multiple(&mut rand::rng(), state.home_pick_count)
        .map(|row| row.product_num.clone())
        .collect();

    tracing::info!(
        pool = pool.len(),
        picked = product_nums.len(),
        "refreshing home picks"
    );

    state
        .store
        .clear_home_picks()
        .await
        .map_err(|e| map_store_error(rid.clone(), &e))?;

    let now = Utc::now();
    let picks: Vec<NewHomePick> = product_nums
        .iter()
        .map(|num| NewHomePick {
            product_num: num.clone(),
            created_at: now,
        })
        .collect();

    let inserted = state
        .store
        .insert_home_picks(&picks)
        .await
        .map_err(|e| map_store_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: RefreshResult {
            inserted,
            product_nums,
        },
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

    fn app_with_store(store_uri: &str, home_pick_count: usize) -> axum::Router {
        let store = StoreClient::new(store_uri, "test-key", 5).expect("store");
        let scraper = PageClient::new(ScrapeConfig::default()).expect("scraper");

        build_app(
            AppState {
                store: Arc::new(store),
                scraper: Arc::new(scraper),
                home_pick_count,
                home_pick_pool_limit: 50,
            },
            AuthState::for_tests(vec![], false),
            default_rate_limit_state(),
        )
    }

    #[tokio::test]
    async fn home_picks_listing_is_public() {
        let store = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/shop_products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!([
                {"product_num": "b07xyz1234", "my_title": "Kettle"}
            ])))
            .mount(&store)
            .await;

        let app = app_with_store(&store.uri(), 6);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/home-picks")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["data"][0]["product_num"], "b07xyz1234");
    }

    #[tokio::test]
    async fn refresh_samples_pool_then_clears_and_inserts() {
        let store = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("approved", "eq.true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!([
                {"product_num": "b07aaaaaaa", "image_main": "https://img/a.jpg"},
                {"product_num": "b07bbbbbbb", "image_main": "https://img/b.jpg"},
                {"product_num": "b07ccccccc", "image_main": "https://img/c.jpg"}
            ])))
            .expect(1)
            .mount(&store)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/shop_products"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&store)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/shop_products"))
            .respond_with(ResponseTemplate::new(201).set_body_json(&json!([
                {"product_num": "x"}, {"product_num": "y"}
            ])))
            .expect(1)
            .mount(&store)
            .await;

        let app = app_with_store(&store.uri(), 2);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/home-picks/refresh")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["data"]["inserted"], 2);
        let nums = json["data"]["product_nums"].as_array().expect("array");
        assert_eq!(nums.len(), 2);
        // Sampled without replacement.
        assert_ne!(nums[0], nums[1]);
    }

    #[tokio::test]
    async fn refresh_with_empty_pool_inserts_nothing() {
        let store = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!([])))
            .expect(1)
            .mount(&store)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/shop_products"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&store)
            .await;

        // No POST mock: an empty rotation must not be sent to the store.

        let app = app_with_store(&store.uri(), 6);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/home-picks/refresh")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["data"]["inserted"], 0);
    }
}
