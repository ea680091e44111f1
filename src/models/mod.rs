//! Data models for the accession desk

pub mod edit;
pub mod record;

// Re-export commonly used types
pub use edit::{EditSession, FieldChanges, GlobalDraft, GlobalDraftView, RecordPatch};
pub use record::{Accession, FieldName, Record, RecordView, NO_PLACE};
