//! Accession Desk server

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accession_desk::{
    api,
    config::AppConfig,
    repository::HttpRecordStore,
    services::{persist, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("accession_desk={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Accession Desk v{}", env!("CARGO_PKG_VERSION"));

    let store = HttpRecordStore::new(&config.record_store)
        .context("Failed to create record store client")?;
    tracing::info!("Record store at {}", config.record_store.base_url);

    let services = Services::new(Arc::new(store));
    persist::spawn_outcome_logger(&services.persist_events);

    // The catalog loads in the background; /ready reports progress
    let catalog = services.catalog.clone();
    tokio::spawn(async move {
        catalog.load_from_store().await;
    });

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
