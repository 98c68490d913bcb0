//! Pustaka Server - library desk
//!
//! Serves the books/members/history REST API over JSON files on disk.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pustaka_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::{JsonFileStore, Repository},
    services::Services,
    AppState,
};

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pustaka_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting Pustaka Server v{}", env!("CARGO_PKG_VERSION"));

    // Open the JSON collections
    let store = JsonFileStore::from_config(&config.storage);
    tokio::fs::create_dir_all(store.data_dir())
        .await
        .with_context(|| format!("Failed to create data directory {}", store.data_dir().display()))?;
    tracing::info!("Using data directory {}", store.data_dir().display());

    let repository = Repository::new(Arc::new(store));
    repository
        .ping()
        .await
        .context("Failed to read data collections")?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(repository)),
    };

    // Build router
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
