//! Search endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::{Accession, Record, RecordView},
};

/// Query parameters for a search
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SearchParams {
    /// Accession number, or text to find in titles and holder names
    #[serde(default)]
    pub q: String,
}

/// Current result set
#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    /// Query that produced the results
    pub query: String,
    /// Number of records
    pub total: usize,
    pub items: Vec<RecordView>,
}

impl SearchResponse {
    pub fn new(query: String, records: &[Record]) -> Self {
        Self {
            query,
            total: records.len(),
            items: records.iter().map(RecordView::from).collect(),
        }
    }
}

/// Search the catalog and make the results the active result set
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching records", body = SearchResponse)
    )
)]
pub async fn search(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let results = state.services.desk.search(&params.q);
    Json(SearchResponse::new(params.q, &results))
}

/// Get a record by accession number
#[utoipa::path(
    get,
    path = "/records/{accession}",
    tag = "search",
    params(
        ("accession" = String, Path, description = "Accession number")
    ),
    responses(
        (status = 200, description = "Record", body = RecordView),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_record(
    State(state): State<crate::AppState>,
    Path(accession): Path<String>,
) -> AppResult<Json<RecordView>> {
    let accession = Accession::from(accession);
    let catalog = state.services.catalog.snapshot();
    let record = catalog
        .find(&accession)
        .ok_or_else(|| AppError::NotFound(format!("Record {} not found", accession)))?;
    Ok(Json(RecordView::from(record)))
}
