//! API integration tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use accession_desk::{
    api::create_router,
    config::AppConfig,
    error::{AppError, AppResult},
    models::Record,
    repository::RecordStore,
    services::{persist::PersistOutcome, Services},
    AppState,
};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tower::ServiceExt;

/// Record store kept in memory, recording every save
#[derive(Default)]
struct MemoryStore {
    records: Mutex<Vec<Record>>,
    saves: Mutex<Vec<Vec<Record>>>,
    unreachable: bool,
    reject_saves: bool,
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_all(&self) -> AppResult<Vec<Record>> {
        if self.unreachable {
            return Err(AppError::RecordStore("connection refused".to_string()));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn save_all(&self, records: Vec<Record>) -> AppResult<()> {
        if self.unreachable || self.reject_saves {
            return Err(AppError::RecordStore("Catalog save failed with status 500".to_string()));
        }
        self.saves.lock().unwrap().push(records.clone());
        *self.records.lock().unwrap() = records;
        Ok(())
    }

    async fn download(&self) -> AppResult<Vec<u8>> {
        if self.unreachable {
            return Err(AppError::RecordStore("connection refused".to_string()));
        }
        let records = self.records.lock().unwrap().clone();
        Ok(serde_json::to_vec(&records).unwrap())
    }
}

struct TestDesk {
    app: Router,
    store: Arc<MemoryStore>,
    outcomes: broadcast::Receiver<PersistOutcome>,
}

fn seed() -> Value {
    json!([
        {"ACCESSION": 12, "TITLE": "Physics I", "NAME": "A"},
        {"ACCESSION": "13", "TITLE": "Physics I", "NAME": "B"},
        {"ACCESSION": 20, "TITLE": "Chemistry", "NAME": "C", "SHELF": "R3"}
    ])
}

async fn desk_with(store: MemoryStore) -> TestDesk {
    let store = Arc::new(store);
    let services = Services::new(store.clone());
    let outcomes = services.persist_events.subscribe();
    services.catalog.load_from_store().await;

    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    };
    TestDesk {
        app: create_router(state),
        store,
        outcomes,
    }
}

async fn desk() -> TestDesk {
    let records: Vec<Record> = serde_json::from_value(seed()).unwrap();
    desk_with(MemoryStore {
        records: Mutex::new(records),
        ..Default::default()
    })
    .await
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn accessions(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["accession"].as_str().unwrap().to_string())
        .collect()
}

async fn next_outcome(desk: &mut TestDesk) -> PersistOutcome {
    tokio::time::timeout(Duration::from_secs(5), desk.outcomes.recv())
        .await
        .expect("persist outcome")
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let desk = desk().await;
    let (status, body) = call(&desk.app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reports_loaded_catalog() {
    let desk = desk().await;
    let (status, body) = call(&desk.app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["records"], 3);
}

#[tokio::test]
async fn test_load_failure_is_reported_and_catalog_stays_empty() {
    let desk = desk_with(MemoryStore {
        unreachable: true,
        ..Default::default()
    })
    .await;

    let (status, body) = call(&desk.app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["records"], 0);

    let (_, body) = call(&desk.app, Method::GET, "/api/v1/search?q=physics", None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_search_scenarios() {
    let desk = desk().await;

    let (status, body) = call(&desk.app, Method::GET, "/api/v1/search?q=12", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accessions(&body), vec!["12", "13"]);
    assert_eq!(body["items"][1]["name"], "B");
    assert_eq!(body["items"][0]["place"], "No place available");

    let (_, body) = call(&desk.app, Method::GET, "/api/v1/search?q=chem", None).await;
    assert_eq!(accessions(&body), vec!["20"]);

    let (_, body) = call(&desk.app, Method::GET, "/api/v1/search?q=99", None).await;
    assert_eq!(body["total"], 0);

    let (_, body) = call(&desk.app, Method::GET, "/api/v1/search", None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_get_record() {
    let desk = desk().await;
    let (status, body) = call(&desk.app, Method::GET, "/api/v1/records/20", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Chemistry");

    let (status, body) = call(&desk.app, Method::GET, "/api/v1/records/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchRecord");
}

#[tokio::test]
async fn test_global_edit_applies_to_result_set_and_persists() {
    let mut desk = desk().await;
    call(&desk.app, Method::GET, "/api/v1/search?q=12", None).await;

    let (status, body) = call(&desk.app, Method::POST, "/api/v1/edit/global", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["field"], "PLACE");

    let (status, _) = call(
        &desk.app,
        Method::PUT,
        "/api/v1/edit/global",
        Some(json!({"value": "Main Hall"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&desk.app, Method::POST, "/api/v1/edit/global/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accessions(&body), vec!["12", "13"]);
    assert!(body["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["place"] == "Main Hall"));

    assert!(next_outcome(&mut desk).await.is_saved());
    let saves = desk.store.saves.lock().unwrap().clone();
    assert_eq!(saves.len(), 1);
    let saved = serde_json::to_value(&saves[0]).unwrap();
    assert_eq!(saved[0]["PLACE"], "Main Hall");
    assert_eq!(saved[1]["PLACE"], "Main Hall");
    assert!(saved[2].get("PLACE").is_none());
    assert_eq!(saved[2]["SHELF"], "R3");
    assert_eq!(saved[0]["ACCESSION"], "12");

    let (status, _) = call(&desk.app, Method::GET, "/api/v1/edit/global", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_global_edit_without_value_is_rejected() {
    let desk = desk().await;
    call(&desk.app, Method::GET, "/api/v1/search?q=physics", None).await;
    call(&desk.app, Method::POST, "/api/v1/edit/global", None).await;

    let (status, body) = call(&desk.app, Method::POST, "/api/v1/edit/global/submit", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Please enter a value to update.");

    // Form is still open and nothing was saved
    let (status, _) = call(&desk.app, Method::GET, "/api/v1/edit/global", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(desk.store.saves.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_global_toggle() {
    let desk = desk().await;
    let (_, body) = call(&desk.app, Method::POST, "/api/v1/edit/global/toggle", None).await;
    assert_eq!(body["open"], true);
    let (_, body) = call(&desk.app, Method::POST, "/api/v1/edit/global/toggle", None).await;
    assert_eq!(body["open"], false);
    assert!(body["draft"].is_null());
}

#[tokio::test]
async fn test_individual_edit_flow() {
    let mut desk = desk().await;
    call(&desk.app, Method::GET, "/api/v1/search?q=chem", None).await;

    let (status, body) = call(&desk.app, Method::POST, "/api/v1/edit/individual/20", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Chemistry");

    let (status, body) = call(
        &desk.app,
        Method::PUT,
        "/api/v1/edit/individual",
        Some(json!({"accession": "999", "title": "Organic Chemistry", "dept": "Science"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accession"], "20");

    let (status, body) = call(&desk.app, Method::POST, "/api/v1/edit/individual/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accessions(&body), vec!["20"]);
    assert_eq!(body["items"][0]["title"], "Organic Chemistry");
    assert_eq!(body["items"][0]["dept"], "Science");
    assert_eq!(body["items"][0]["name"], "C");

    assert!(next_outcome(&mut desk).await.is_saved());

    let (_, body) = call(&desk.app, Method::GET, "/api/v1/records/20", None).await;
    assert_eq!(body["title"], "Organic Chemistry");
    let (status, _) = call(&desk.app, Method::GET, "/api/v1/records/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancelled_individual_edit_changes_nothing() {
    let desk = desk().await;
    call(&desk.app, Method::POST, "/api/v1/edit/individual/12", None).await;
    call(
        &desk.app,
        Method::PUT,
        "/api/v1/edit/individual",
        Some(json!({"title": "Never saved"})),
    )
    .await;

    let (status, _) = call(&desk.app, Method::DELETE, "/api/v1/edit/individual", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&desk.app, Method::POST, "/api/v1/edit/individual/submit", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "NoActiveEdit");

    let (_, body) = call(&desk.app, Method::GET, "/api/v1/records/12", None).await;
    assert_eq!(body["title"], "Physics I");
    assert!(desk.store.saves.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_save_failure_keeps_local_edit() {
    let records: Vec<Record> = serde_json::from_value(seed()).unwrap();
    let mut desk = desk_with(MemoryStore {
        records: Mutex::new(records),
        reject_saves: true,
        ..Default::default()
    })
    .await;

    call(&desk.app, Method::GET, "/api/v1/search?q=physics", None).await;
    call(&desk.app, Method::POST, "/api/v1/edit/global", None).await;
    call(
        &desk.app,
        Method::PUT,
        "/api/v1/edit/global",
        Some(json!({"field": "DEPT", "value": "Science"})),
    )
    .await;
    let (status, body) = call(&desk.app, Method::POST, "/api/v1/edit/global/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["dept"], "Science");

    assert!(!next_outcome(&mut desk).await.is_saved());

    let (_, body) = call(&desk.app, Method::GET, "/api/v1/records/13", None).await;
    assert_eq!(body["dept"], "Science");
    assert!(desk.store.saves.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_download() {
    let desk = desk().await;
    let response = desk
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/download")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"library_data.json\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let exported: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(exported.as_array().unwrap().len(), 3);
}
