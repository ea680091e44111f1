//! Record store client
//!
//! The record store is the remote service that owns the persisted catalog.
//! It speaks plain JSON over HTTP:
//!
//! - `GET  /api/data`     - the whole catalog
//! - `POST /api/save`     - replace the whole catalog
//! - `GET  /api/download` - export file

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{
    config::RecordStoreConfig,
    error::{AppError, AppResult},
    models::Record,
};

/// Persistence collaborator for the catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the full catalog
    async fn fetch_all(&self) -> AppResult<Vec<Record>>;

    /// Replace the persisted catalog with `records`
    async fn save_all(&self, records: Vec<Record>) -> AppResult<()>;

    /// Raw export file bytes
    async fn download(&self) -> AppResult<Vec<u8>>;
}

/// Decode a catalog payload.
///
/// The payload must be a JSON array. Entries that are not objects cannot
/// carry an accession and are dropped with a warning; object entries are
/// accepted whatever their shape.
pub fn decode_catalog(payload: Value) -> AppResult<Vec<Record>> {
    let entries = match payload {
        Value::Array(entries) => entries,
        other => {
            return Err(AppError::RecordStore(format!(
                "Expected a JSON array of records, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            tracing::warn!(
                "Skipping catalog entry {}: expected an object, got {}",
                index,
                json_kind(&entry)
            );
            continue;
        }
        records.push(serde_json::from_value(entry)?);
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Record store reached over HTTP
#[derive(Clone)]
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(config: &RecordStoreConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch_all(&self) -> AppResult<Vec<Record>> {
        let url = self.url("/api/data");
        tracing::debug!("Fetching catalog from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RecordStore(format!(
                "Catalog fetch failed with status {}",
                status
            )));
        }

        let payload: Value = response.json().await?;
        decode_catalog(payload)
    }

    async fn save_all(&self, records: Vec<Record>) -> AppResult<()> {
        let response = self
            .client
            .post(self.url("/api/save"))
            .json(&records)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RecordStore(format!(
                "Catalog save failed with status {}",
                status
            )));
        }
        Ok(())
    }

    async fn download(&self) -> AppResult<Vec<u8>> {
        let response = self.client.get(self.url("/api/download")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RecordStore(format!(
                "Failed to download file: status {}",
                status
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
