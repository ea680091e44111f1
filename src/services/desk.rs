//! Desk session
//!
//! The desk is the single mutable owner of what a librarian is looking at:
//! the current query, the result set it produced, and the two edit forms
//! (one record at a time, or one field across the whole result set).
//! Every operation runs to completion under one lock, so a submit always
//! sees the result set as it stands at that moment.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::{AppError, AppResult},
    models::{Accession, EditSession, FieldChanges, FieldName, GlobalDraft, Record, RecordPatch},
};

use super::catalog::CatalogService;
use super::reconcile::global_edit_scope;
use super::search::search;

#[derive(Default)]
struct DeskState {
    query: String,
    results: Vec<Record>,
    individual: EditSession<RecordPatch>,
    global: EditSession<GlobalDraft>,
}

impl DeskState {
    fn refresh(&mut self, records: &[Record]) {
        self.results = search(records, &self.query);
    }
}

#[derive(Clone)]
pub struct DeskService {
    catalog: CatalogService,
    state: Arc<Mutex<DeskState>>,
}

impl DeskService {
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog,
            state: Arc::new(Mutex::new(DeskState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeskState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `query` against the current catalog and make it the active result set
    pub fn search(&self, query: &str) -> Vec<Record> {
        let snapshot = self.catalog.snapshot();
        let mut state = self.lock();
        state.query = query.to_string();
        state.refresh(snapshot.records());
        tracing::debug!("Query {:?} matched {} records", query, state.results.len());
        state.results.clone()
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn results(&self) -> Vec<Record> {
        self.lock().results.clone()
    }

    /// Open the individual edit form on the record with `accession`
    pub fn begin_individual_edit(&self, accession: &Accession) -> AppResult<RecordPatch> {
        let snapshot = self.catalog.snapshot();
        let record = snapshot
            .find(accession)
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", accession)))?;

        let draft = RecordPatch::seeded_from(record);
        self.lock().individual.begin(draft.clone());
        Ok(draft)
    }

    pub fn individual_draft(&self) -> Option<RecordPatch> {
        self.lock().individual.draft().cloned()
    }

    /// Apply form input to the open individual draft. The accession is read-only.
    pub fn update_individual_draft(&self, changes: &FieldChanges) -> AppResult<RecordPatch> {
        let mut state = self.lock();
        let draft = state
            .individual
            .draft_mut()
            .ok_or_else(|| AppError::NoActiveEdit("No record is being edited".to_string()))?;
        draft.apply(changes);
        Ok(draft.clone())
    }

    /// Save the individual draft into the catalog and close the form
    pub fn submit_individual_edit(&self) -> AppResult<Vec<Record>> {
        let mut state = self.lock();
        let draft = state
            .individual
            .finish()
            .ok_or_else(|| AppError::NoActiveEdit("No record is being edited".to_string()))?;

        let catalog = self.catalog.apply_individual_edit(&draft);
        state.refresh(catalog.records());
        Ok(state.results.clone())
    }

    /// Close the individual form without touching the catalog
    pub fn cancel_individual_edit(&self) -> bool {
        self.lock().individual.finish().is_some()
    }

    /// Open the global edit form with an empty draft
    pub fn begin_global_edit(&self) -> GlobalDraft {
        let draft = GlobalDraft::default();
        self.lock().global.begin(draft.clone());
        draft
    }

    /// Open the global form if it is closed, close it if it is open
    pub fn toggle_global_edit(&self) -> Option<GlobalDraft> {
        let mut state = self.lock();
        if state.global.finish().is_some() {
            return None;
        }
        let draft = GlobalDraft::default();
        state.global.begin(draft.clone());
        Some(draft)
    }

    pub fn global_draft(&self) -> Option<GlobalDraft> {
        self.lock().global.draft().cloned()
    }

    /// Select the target field and/or type a value for it
    pub fn update_global_draft(
        &self,
        field: Option<FieldName>,
        value: Option<String>,
    ) -> AppResult<GlobalDraft> {
        let mut state = self.lock();
        let draft = state
            .global
            .draft_mut()
            .ok_or_else(|| AppError::NoActiveEdit("Global edit is not open".to_string()))?;
        if let Some(field) = field {
            draft.select(field);
        }
        if let Some(value) = value {
            draft.set_value(value);
        }
        Ok(draft.clone())
    }

    /// Apply the global draft to every record in the current result set.
    ///
    /// With no value typed for the selected field the form stays open and
    /// nothing changes.
    pub fn submit_global_edit(&self) -> AppResult<Vec<Record>> {
        let snapshot = self.catalog.snapshot();
        let mut state = self.lock();
        let draft = state
            .global
            .draft()
            .cloned()
            .ok_or_else(|| AppError::NoActiveEdit("Global edit is not open".to_string()))?;

        let scope = global_edit_scope(snapshot.records(), &state.results);
        let catalog = self.catalog.apply_global_edit(
            draft.field(),
            draft.value().unwrap_or_default(),
            &scope,
        )?;

        state.global.finish();
        state.refresh(catalog.records());
        Ok(state.results.clone())
    }

    /// Close the global form without touching the catalog
    pub fn cancel_global_edit(&self) -> bool {
        self.lock().global.finish().is_some()
    }
}
