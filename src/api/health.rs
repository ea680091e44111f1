//! Health check endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::catalog::LoadState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    /// `ready`, `loading` or `failed`
    pub status: String,
    pub version: String,
    /// Catalog load progress
    pub load: LoadState,
    /// Records currently held in memory
    pub records: usize,
    /// Catalog revision
    pub revision: u64,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint (reports the catalog load state)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Catalog is loaded", body = ReadyResponse),
        (status = 503, description = "Catalog is loading or failed to load", body = ReadyResponse)
    )
)]
pub async fn readiness_check(
    State(state): State<crate::AppState>,
) -> (StatusCode, Json<ReadyResponse>) {
    let catalog = state.services.catalog.snapshot();
    let load = state.services.catalog.load_state();
    let (code, status) = match load {
        LoadState::Ready => (StatusCode::OK, "ready"),
        LoadState::Loading => (StatusCode::SERVICE_UNAVAILABLE, "loading"),
        LoadState::Failed { .. } => (StatusCode::SERVICE_UNAVAILABLE, "failed"),
    };

    (
        code,
        Json(ReadyResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            load,
            records: catalog.len(),
            revision: catalog.revision(),
        }),
    )
}
