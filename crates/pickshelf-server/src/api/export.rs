//! Export handlers: raw JSON table backups and a product CSV.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use pickshelf_core::ProductRecord;
use pickshelf_store::{ArchiveState, BackupTable, ProductFilters};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct BackupQuery {
    pub table: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CsvQuery {
    pub state: Option<String>,
    pub limit: Option<u32>,
}

const CSV_COLUMNS: [&str; 13] = [
    "product_num",
    "manufacturer",
    "my_title",
    "my_subtitle",
    "my_description_short",
    "amazon_title",
    "amazon_category",
    "affiliate_link",
    "image_main",
    "approved",
    "added_by",
    "archived_at",
    "created_at",
];

/// GET /api/v1/export/backup?table=... — dump one allow-listed table as a
/// JSON attachment.
pub(super) async fn export_backup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<BackupQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rid = &req_id.0;

    let table = BackupTable::parse(&query.table).ok_or_else(|| {
        ApiError::new(
            rid,
            "validation_error",
            format!(
                "unknown table \"{}\"; expected products, shop_products, or categories",
                query.table
            ),
        )
    })?;

    let rows = state
        .store
        .export_table(table)
        .await
        .map_err(|e| map_store_error(rid.clone(), &e))?;

    tracing::info!(table = table.as_str(), rows = rows.len(), "backup exported");

    let filename = format!(
        "{}-backup-{}.json",
        table.as_str(),
        Utc::now().format("%Y-%m-%d")
    );
    let body = Json(ApiResponse {
        data: serde_json::json!({
            "table": table.as_str(),
            "exported_at": Utc::now(),
            "rows": rows,
        }),
        meta: ResponseMeta::new(req_id.0),
    });

    Ok((attachment_headers(&filename, "application/json"), body))
}

/// GET /api/v1/export/csv — product listing as a CSV attachment.
pub(super) async fn export_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CsvQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filters = ProductFilters {
        state: query
            .state
            .as_deref()
            .map(ArchiveState::parse)
            .unwrap_or_default(),
        limit: query.limit,
        ..ProductFilters::default()
    };

    let rows = state
        .store
        .list_products(&filters)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    let filename = format!("products-{}.csv", Utc::now().format("%Y-%m-%d"));
    Ok((
        attachment_headers(&filename, "text/csv; charset=utf-8"),
        render_csv(&rows),
    ))
}

fn attachment_headers(filename: &str, content_type: &str) -> [(header::HeaderName, String); 3] {
    [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
        (header::CACHE_CONTROL, "no-store".to_string()),
    ]
}

fn render_csv(rows: &[ProductRecord]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_COLUMNS.join(","));
    out.push_str("\r\n");

    for row in rows {
        let archived_at = row.archived_at.map(|t| t.to_rfc3339()).unwrap_or_default();
        let created_at = row.created_at.map(|t| t.to_rfc3339()).unwrap_or_default();
        let fields = [
            row.product_num.as_str(),
            row.manufacturer.as_deref().unwrap_or_default(),
            row.my_title.as_deref().unwrap_or_default(),
            row.my_subtitle.as_deref().unwrap_or_default(),
            row.my_description_short.as_deref().unwrap_or_default(),
            row.amazon_title.as_deref().unwrap_or_default(),
            row.amazon_category.as_deref().unwrap_or_default(),
            row.affiliate_link.as_deref().unwrap_or_default(),
            row.image_main.as_deref().unwrap_or_default(),
            if row.approved { "true" } else { "false" },
            row.added_by.as_deref().unwrap_or_default(),
            archived_at.as_str(),
            created_at.as_str(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }

    out
}

/// Quotes a field when it contains a delimiter, quote, or line break;
/// embedded quotes double up.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
