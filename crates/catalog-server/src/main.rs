//! Catalog Server - Main entry point

use anyhow::Result;
use catalog_common::logging::{init_logging, LogConfig};
use catalog_ingest::feed::FeedFetcher;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing::info;

use catalog_server::{
    api,
    config::Config,
    features::{FeatureState, RequestSettings},
    storage::{DynProductStore, MemoryProductStore, PgProductStore, StorageBackend},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("catalog-server")
        .filter_directives("catalog_server=debug,catalog_ingest=debug,tower_http=debug,sqlx=info")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    info!("Starting Catalog Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let store: DynProductStore = match config.storage.backend {
        StorageBackend::Postgres => Arc::new(PgProductStore::connect(&config.database).await?),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; products are lost on restart");
            Arc::new(MemoryProductStore::new())
        },
    };
    info!(backend = %store.backend(), "Product store ready");

    let fetcher = FeedFetcher::new(config.fetcher_config())?;

    let state = FeatureState {
        store,
        fetcher,
        settings: RequestSettings {
            rpc_timeout: config.rpc_timeout(),
            feed_failure_policy: config.feed.failure_policy,
        },
    };

    let app = api::create_router(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
