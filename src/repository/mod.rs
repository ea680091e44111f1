//! Repository layer for the remote record store

pub mod record_store;

pub use record_store::{decode_catalog, HttpRecordStore, RecordStore};
