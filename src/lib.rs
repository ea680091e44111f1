//! Accession Desk
//!
//! Search a library catalog by accession number, title or holder name, and
//! edit records one at a time or in bulk across the current result set.
//! The catalog lives in memory; a remote record store persists it.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
