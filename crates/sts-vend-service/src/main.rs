//! Sts-Vend Service - HTTP API for prepaid meter token vending.
//!
//! This is the main entry point for the sts-vend service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sts_vend_service::{create_router, AppState, ServiceConfig};
use sts_vend_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sts_vend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sts-Vend Service");

    // Load configuration from environment; a missing variable is fatal here,
    // before anything binds or opens.
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "FATAL: invalid service configuration");
            return Err(err.into());
        }
    };

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        sts_url = %config.sts_api_base_url,
        sts_accounts = config.sts_user_ids.len(),
        "Service configuration loaded"
    );

    // Initialize RocksDB store
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    // Build app state
    let state = AppState::new(store, config.clone());

    // Create the router
    let app = create_router(state);

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
