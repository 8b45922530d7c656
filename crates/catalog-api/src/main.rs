//! Catalog server binary.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! catalogd --config config.yaml
//!
//! # With environment variables only
//! CATALOG_STORAGE__SEED_PATH=fixtures/catalog.json catalogd
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

use catalog_api::http::{
    create_router_with_body_limit, create_router_with_observability_and_limit, AppState,
};
use catalog_api::middleware::{with_standard_layers, RequestMetrics};
use catalog_api::observability::{init_logging, init_metrics, LoggingConfig};
use catalog_server::ServerConfig;
use catalog_storage::{Fixture, MemoryDataStore};

/// Subject catalog HTTP server
#[derive(Parser, Debug)]
#[command(name = "catalogd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => ServerConfig::load(&path)?,
        None => ServerConfig::from_env()?,
    };

    init_logging(LoggingConfig::from(&config.logging));
    info!(version = env!("CARGO_PKG_VERSION"), "starting catalog server");

    // Validation restricts the backend to "memory"
    let storage = MemoryDataStore::new_shared();
    if let Some(seed_path) = &config.storage.seed_path {
        info!(path = %seed_path, "seeding in-memory store");
        Fixture::from_path(seed_path)?.apply(&*storage).await?;
    }

    let state = AppState::with_config(
        storage,
        (&config.batch).into(),
        (&config.cache).into(),
    );

    let body_limit = config.server.body_limit_bytes;
    let router = if config.metrics.enabled {
        let metrics_state = init_metrics()?;
        info!("metrics enabled at /metrics");
        create_router_with_observability_and_limit(state, metrics_state, body_limit)
    } else {
        create_router_with_body_limit(state, body_limit)
    };
    let router = with_standard_layers(
        router,
        Arc::new(RequestMetrics::new()),
        config.server.request_timeout(),
    );

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires, so the
/// other signal still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
