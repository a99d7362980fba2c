use axum::{extract::State, Extension, Json};
use pickshelf_scraper::{scrape_product, ScrapedProduct};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRequest {
    pub input: String,
}

/// POST /api/v1/scrape — fetch product metadata for an ASIN, URL, or short link.
///
/// A blocked marketplace page is not an error: the response then carries a
/// minimal record with a `warning` field set.
pub(super) async fn scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ScrapeRequest>,
) -> Result<Json<ApiResponse<ScrapedProduct>>, ApiError> {
    let rid = &req_id.0;

    if body.input.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "input must be a non-empty ASIN, product URL, or short link",
        ));
    }

    let scraped = scrape_product(&state.scraper, &body.input)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, input = body.input, "scrape failed");
            ApiError::new(
                rid,
                "upstream_error",
                format!("failed to fetch product page: {}", diagnostic(&e)),
            )
        })?;

    Ok(Json(ApiResponse {
        data: scraped,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Transport errors can carry long upstream chains; cap what reaches clients.
fn diagnostic(e: &pickshelf_scraper::ScrapeError) -> String {
    const MAX: usize = 200;
    let text = e.to_string();
    if text.chars().count() <= MAX {
        return text;
    }
    let truncated: String = text.chars().take(MAX).collect();
    format!("{truncated}…")
}
