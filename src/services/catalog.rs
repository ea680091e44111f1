//! Catalog store
//!
//! Owns the authoritative in-memory catalog. Readers get cheap immutable
//! snapshots; every mutation builds a new record list through the pure
//! functions in [`super::reconcile`], swaps it in, then saves it in the
//! background.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Accession, FieldName, Record, RecordPatch},
    repository::RecordStore,
};

use super::persist::{persist_in_background, PersistEvents};
use super::reconcile::{self, Reconciled};

/// Immutable view of the catalog at one revision
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Arc<Vec<Record>>,
    revision: u64,
}

impl Catalog {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(records),
            revision: 0,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of mutations applied since the catalog was created
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record carrying `accession`
    pub fn find(&self, accession: &Accession) -> Option<&Record> {
        self.records.iter().find(|r| r.accession == *accession)
    }

    fn next(&self, records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(records),
            revision: self.revision + 1,
        }
    }
}

/// Progress of the startup load from the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
    Failed { reason: String },
}

struct CatalogState {
    catalog: Catalog,
    load: LoadState,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
    state: Arc<RwLock<CatalogState>>,
    events: PersistEvents,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>, events: PersistEvents) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(CatalogState {
                catalog: Catalog::default(),
                load: LoadState::Loading,
            })),
            events,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current catalog snapshot
    pub fn snapshot(&self) -> Catalog {
        self.read().catalog.clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.read().load.clone()
    }

    /// Replace the catalog wholesale. No validation is performed.
    pub fn load(&self, records: Vec<Record>) -> Catalog {
        let mut state = self.write();
        state.catalog = state.catalog.next(records);
        state.load = LoadState::Ready;
        state.catalog.clone()
    }

    /// Fetch the catalog from the record store.
    ///
    /// On failure the catalog is left empty and the load state records why.
    /// There is no retry.
    pub async fn load_from_store(&self) -> LoadState {
        tracing::info!("Loading catalog from record store");
        match self.store.fetch_all().await {
            Ok(records) => {
                let catalog = self.load(records);
                tracing::info!("Catalog loaded: {} records", catalog.len());
            }
            Err(e) => {
                tracing::error!("Error loading data: {}", e);
                let mut state = self.write();
                state.catalog = state.catalog.next(Vec::new());
                state.load = LoadState::Failed {
                    reason: e.to_string(),
                };
            }
        }
        self.load_state()
    }

    /// Merge `patch` into every record with the same accession, then persist.
    ///
    /// An accession that is no longer in the catalog leaves it unchanged.
    pub fn apply_individual_edit(&self, patch: &RecordPatch) -> Catalog {
        let mut state = self.write();
        let Reconciled { records, matched } =
            reconcile::apply_individual_edit(state.catalog.records(), patch);
        if matched == 0 {
            tracing::debug!("Individual edit for {} matched no record", patch.accession);
        }
        self.commit(&mut state, records)
    }

    /// Set `field` on every record in `scope`, then persist.
    pub fn apply_global_edit(
        &self,
        field: FieldName,
        value: &str,
        scope: &HashSet<Accession>,
    ) -> AppResult<Catalog> {
        let mut state = self.write();
        let Reconciled { records, matched } =
            reconcile::apply_global_edit(state.catalog.records(), field, value, scope)?;
        tracing::info!("Global edit set {} on {} records", field, matched);
        Ok(self.commit(&mut state, records))
    }

    fn commit(&self, state: &mut CatalogState, records: Vec<Record>) -> Catalog {
        state.catalog = state.catalog.next(records);
        let catalog = state.catalog.clone();
        persist_in_background(self.store.clone(), catalog.clone(), self.events.clone());
        catalog
    }

    /// Export file produced by the record store
    pub async fn export(&self) -> AppResult<Vec<u8>> {
        self.store.download().await
    }
}
