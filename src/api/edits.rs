//! Edit endpoints
//!
//! Two independent forms: the individual form edits one record, the global
//! form sets one field on every record of the current result set.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Accession, FieldChanges, FieldName, GlobalDraftView, RecordPatch},
};

use super::search::SearchResponse;

/// Global edit form input
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateGlobalDraft {
    /// Field to change on every result
    pub field: Option<FieldName>,
    /// New value for the selected field
    pub value: Option<String>,
}

/// Global edit form state after a toggle
#[derive(Serialize, ToSchema)]
pub struct GlobalToggleResponse {
    pub open: bool,
    pub draft: Option<GlobalDraftView>,
}

/// Open the individual edit form on a record
#[utoipa::path(
    post,
    path = "/edit/individual/{accession}",
    tag = "edit",
    params(
        ("accession" = String, Path, description = "Accession number")
    ),
    responses(
        (status = 200, description = "Draft seeded from the record", body = RecordPatch),
        (status = 404, description = "Record not found")
    )
)]
pub async fn begin_individual_edit(
    State(state): State<crate::AppState>,
    Path(accession): Path<String>,
) -> AppResult<Json<RecordPatch>> {
    let draft = state
        .services
        .desk
        .begin_individual_edit(&Accession::from(accession))?;
    Ok(Json(draft))
}

/// Show the open individual draft
#[utoipa::path(
    get,
    path = "/edit/individual",
    tag = "edit",
    responses(
        (status = 200, description = "Open draft", body = RecordPatch),
        (status = 409, description = "No record is being edited")
    )
)]
pub async fn get_individual_edit(
    State(state): State<crate::AppState>,
) -> AppResult<Json<RecordPatch>> {
    state
        .services
        .desk
        .individual_draft()
        .map(Json)
        .ok_or_else(|| AppError::NoActiveEdit("No record is being edited".to_string()))
}

/// Type into the individual edit form
#[utoipa::path(
    put,
    path = "/edit/individual",
    tag = "edit",
    request_body = FieldChanges,
    responses(
        (status = 200, description = "Updated draft", body = RecordPatch),
        (status = 409, description = "No record is being edited")
    )
)]
pub async fn update_individual_edit(
    State(state): State<crate::AppState>,
    Json(changes): Json<FieldChanges>,
) -> AppResult<Json<RecordPatch>> {
    let draft = state.services.desk.update_individual_draft(&changes)?;
    Ok(Json(draft))
}

/// Save the individual draft
#[utoipa::path(
    post,
    path = "/edit/individual/submit",
    tag = "edit",
    responses(
        (status = 200, description = "Edit applied; refreshed results", body = SearchResponse),
        (status = 409, description = "No record is being edited")
    )
)]
pub async fn submit_individual_edit(
    State(state): State<crate::AppState>,
) -> AppResult<Json<SearchResponse>> {
    let desk = &state.services.desk;
    let results = desk.submit_individual_edit()?;
    Ok(Json(SearchResponse::new(desk.query(), &results)))
}

/// Close the individual form without saving
#[utoipa::path(
    delete,
    path = "/edit/individual",
    tag = "edit",
    responses(
        (status = 204, description = "Form closed")
    )
)]
pub async fn cancel_individual_edit(State(state): State<crate::AppState>) -> StatusCode {
    state.services.desk.cancel_individual_edit();
    StatusCode::NO_CONTENT
}

/// Open the global edit form
#[utoipa::path(
    post,
    path = "/edit/global",
    tag = "edit",
    responses(
        (status = 200, description = "Empty draft", body = GlobalDraftView)
    )
)]
pub async fn begin_global_edit(State(state): State<crate::AppState>) -> Json<GlobalDraftView> {
    let draft = state.services.desk.begin_global_edit();
    Json(GlobalDraftView::from(&draft))
}

/// Open the global edit form, or close it if already open
#[utoipa::path(
    post,
    path = "/edit/global/toggle",
    tag = "edit",
    responses(
        (status = 200, description = "Form state", body = GlobalToggleResponse)
    )
)]
pub async fn toggle_global_edit(
    State(state): State<crate::AppState>,
) -> Json<GlobalToggleResponse> {
    let draft = state.services.desk.toggle_global_edit();
    Json(GlobalToggleResponse {
        open: draft.is_some(),
        draft: draft.as_ref().map(GlobalDraftView::from),
    })
}

/// Show the open global draft
#[utoipa::path(
    get,
    path = "/edit/global",
    tag = "edit",
    responses(
        (status = 200, description = "Open draft", body = GlobalDraftView),
        (status = 409, description = "Global edit is not open")
    )
)]
pub async fn get_global_edit(
    State(state): State<crate::AppState>,
) -> AppResult<Json<GlobalDraftView>> {
    state
        .services
        .desk
        .global_draft()
        .map(|draft| Json(GlobalDraftView::from(&draft)))
        .ok_or_else(|| AppError::NoActiveEdit("Global edit is not open".to_string()))
}

/// Select the field and/or type the value of the global edit
#[utoipa::path(
    put,
    path = "/edit/global",
    tag = "edit",
    request_body = UpdateGlobalDraft,
    responses(
        (status = 200, description = "Updated draft", body = GlobalDraftView),
        (status = 409, description = "Global edit is not open")
    )
)]
pub async fn update_global_edit(
    State(state): State<crate::AppState>,
    Json(input): Json<UpdateGlobalDraft>,
) -> AppResult<Json<GlobalDraftView>> {
    let draft = state
        .services
        .desk
        .update_global_draft(input.field, input.value)?;
    Ok(Json(GlobalDraftView::from(&draft)))
}

/// Apply the global draft to the current result set
#[utoipa::path(
    post,
    path = "/edit/global/submit",
    tag = "edit",
    responses(
        (status = 200, description = "Edit applied; refreshed results", body = SearchResponse),
        (status = 409, description = "Global edit is not open"),
        (status = 422, description = "No value entered for the selected field")
    )
)]
pub async fn submit_global_edit(
    State(state): State<crate::AppState>,
) -> AppResult<Json<SearchResponse>> {
    let desk = &state.services.desk;
    let results = desk.submit_global_edit()?;
    Ok(Json(SearchResponse::new(desk.query(), &results)))
}

/// Close the global form without saving
#[utoipa::path(
    delete,
    path = "/edit/global",
    tag = "edit",
    responses(
        (status = 204, description = "Form closed")
    )
)]
pub async fn cancel_global_edit(State(state): State<crate::AppState>) -> StatusCode {
    state.services.desk.cancel_global_edit();
    StatusCode::NO_CONTENT
}
