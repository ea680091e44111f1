//! Business logic services

pub mod catalog;
pub mod desk;
pub mod persist;
pub mod reconcile;
pub mod search;

use std::sync::Arc;

use crate::repository::RecordStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub desk: desk::DeskService,
    pub persist_events: persist::PersistEvents,
}

impl Services {
    /// Create all services on top of the given record store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let persist_events = persist::PersistEvents::new();
        let catalog = catalog::CatalogService::new(store, persist_events.clone());
        Self {
            desk: desk::DeskService::new(catalog.clone()),
            catalog,
            persist_events,
        }
    }
}
