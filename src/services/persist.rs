//! Background persistence of catalog snapshots
//!
//! Every committed mutation saves the whole catalog in its own task. The
//! in-memory catalog is already updated by then; a failed save is reported
//! on the outcome channel and nothing is rolled back or retried.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use uuid::Uuid;

use crate::repository::RecordStore;

use super::catalog::Catalog;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum PersistStatus {
    Saved,
    Failed { reason: String },
}

/// Result of one save attempt
#[derive(Debug, Clone)]
pub struct PersistOutcome {
    pub id: Uuid,
    /// Catalog revision that was sent
    pub revision: u64,
    pub records: usize,
    pub status: PersistStatus,
    pub completed_at: DateTime<Utc>,
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        self.status == PersistStatus::Saved
    }
}

/// Fan-out channel for persist outcomes
#[derive(Clone)]
pub struct PersistEvents {
    sender: broadcast::Sender<PersistOutcome>,
}

impl Default for PersistEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PersistOutcome> {
        self.sender.subscribe()
    }

    pub fn publish(&self, outcome: PersistOutcome) {
        // No subscribers is fine
        let _ = self.sender.send(outcome);
    }
}

/// Save `catalog` to the store and describe what happened
pub async fn persist(store: &dyn RecordStore, catalog: &Catalog) -> PersistOutcome {
    let id = Uuid::new_v4();
    let status = match store.save_all(catalog.records().to_vec()).await {
        Ok(()) => PersistStatus::Saved,
        Err(e) => PersistStatus::Failed {
            reason: e.to_string(),
        },
    };

    PersistOutcome {
        id,
        revision: catalog.revision(),
        records: catalog.len(),
        status,
        completed_at: Utc::now(),
    }
}

/// Fire-and-forget save of `catalog`
pub fn persist_in_background(store: Arc<dyn RecordStore>, catalog: Catalog, events: PersistEvents) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                let outcome = persist(store.as_ref(), &catalog).await;
                events.publish(outcome);
            });
        }
        Err(_) => {
            events.publish(PersistOutcome {
                id: Uuid::new_v4(),
                revision: catalog.revision(),
                records: catalog.len(),
                status: PersistStatus::Failed {
                    reason: "no async runtime available".to_string(),
                },
                completed_at: Utc::now(),
            });
        }
    }
}

/// Log every persist outcome until the channel closes
pub fn spawn_outcome_logger(events: &PersistEvents) -> JoinHandle<()> {
    let mut stream = BroadcastStream::new(events.subscribe());
    tokio::spawn(async move {
        while let Some(item) = stream.next().await {
            match item {
                Ok(outcome) => match &outcome.status {
                    PersistStatus::Saved => tracing::info!(
                        "Data successfully saved: revision {} ({} records, save {})",
                        outcome.revision,
                        outcome.records,
                        outcome.id
                    ),
                    PersistStatus::Failed { reason } => tracing::error!(
                        "Error saving data: revision {} (save {}): {}",
                        outcome.revision,
                        outcome.id,
                        reason
                    ),
                },
                Err(e) => tracing::warn!("Persist outcome logger fell behind: {}", e),
            }
        }
    })
}
