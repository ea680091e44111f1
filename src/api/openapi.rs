//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{download, edits, health, search};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accession Desk API",
        version = "0.1.0",
        description = "Library catalog search and edit API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Search
        search::search,
        search::get_record,
        // Individual edit
        edits::begin_individual_edit,
        edits::get_individual_edit,
        edits::update_individual_edit,
        edits::submit_individual_edit,
        edits::cancel_individual_edit,
        // Global edit
        edits::begin_global_edit,
        edits::toggle_global_edit,
        edits::get_global_edit,
        edits::update_global_edit,
        edits::submit_global_edit,
        edits::cancel_global_edit,
        // Export
        download::download,
    ),
    components(
        schemas(
            // Records
            crate::models::record::RecordView,
            crate::models::record::FieldName,
            crate::models::edit::RecordPatch,
            crate::models::edit::FieldChanges,
            crate::models::edit::GlobalDraftView,
            // Search
            search::SearchParams,
            search::SearchResponse,
            // Edit
            edits::UpdateGlobalDraft,
            edits::GlobalToggleResponse,
            // Health
            health::HealthResponse,
            health::ReadyResponse,
            crate::services::catalog::LoadState,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "search", description = "Catalog search"),
        (name = "edit", description = "Individual and global record edits"),
        (name = "export", description = "Catalog export")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
