//! Export download endpoint

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
};

use crate::error::AppResult;

const EXPORT_FILE_NAME: &str = "library_data.json";

/// Download the record store's export file
#[utoipa::path(
    get,
    path = "/download",
    tag = "export",
    responses(
        (status = 200, description = "Export file"),
        (status = 502, description = "Record store unavailable")
    )
)]
pub async fn download(
    State(state): State<crate::AppState>,
) -> AppResult<([(axum::http::HeaderName, String); 2], Vec<u8>)> {
    let bytes = state.services.catalog.export().await?;
    tracing::info!("Export downloaded: {} bytes", bytes.len());
    Ok((
        [
            (CONTENT_TYPE, "application/json".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        bytes,
    ))
}
