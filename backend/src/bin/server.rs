//! Exoview HTTP Server Binary
//!
//! This is the main entry point for the exoview REST API server.
//! It loads configuration, builds the catalog client and aggregation
//! service, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin exoview-server
//!
//! # Angular-separation policy against a mirror of the archive
//! PROXIMITY_POLICY=angular_separation CATALOG_URL=https://mirror.example/TAP/sync \
//!   cargo run --bin exoview-server
//! ```
//!
//! # Environment Variables
//!
//! - `EXOVIEW_CONFIG`: Path to a TOML config file (default: search for `exoview.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 3000)
//! - `CATALOG_URL`, `CATALOG_TIMEOUT_SECS`, `PROXIMITY_POLICY`, `MAX_NEARBY`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use exoview::catalog::TapClient;
use exoview::http::{create_router, AppState};
use exoview::{AggregationService, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting exoview HTTP Server");

    let config = AppConfig::load()?;
    info!(
        "Catalog: {} (table {}, timeout {}s), policy {:?}, max nearby {}",
        config.catalog.base_url,
        config.catalog.table,
        config.catalog.timeout_secs,
        config.proximity.policy,
        config.proximity.max_results
    );

    let catalog = TapClient::new(
        &config.catalog.base_url,
        config.catalog.format.clone(),
        config.catalog_timeout(),
    )?;
    let service = AggregationService::from_config(Arc::new(catalog), &config);

    // Create router with all endpoints
    let app = create_router(AppState::new(Arc::new(service)));

    let addr = config.bind_address()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
