//! API handlers for the accession desk REST endpoints

pub mod download;
pub mod edits;
pub mod health;
pub mod openapi;
pub mod search;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Search
        .route("/search", get(search::search))
        .route("/records/:accession", get(search::get_record))
        // Individual edit
        .route(
            "/edit/individual",
            get(edits::get_individual_edit)
                .put(edits::update_individual_edit)
                .delete(edits::cancel_individual_edit),
        )
        .route("/edit/individual/submit", post(edits::submit_individual_edit))
        .route("/edit/individual/:accession", post(edits::begin_individual_edit))
        // Global edit
        .route(
            "/edit/global",
            get(edits::get_global_edit)
                .post(edits::begin_global_edit)
                .put(edits::update_global_edit)
                .delete(edits::cancel_global_edit),
        )
        .route("/edit/global/toggle", post(edits::toggle_global_edit))
        .route("/edit/global/submit", post(edits::submit_global_edit))
        // Export
        .route("/download", get(download::download))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
