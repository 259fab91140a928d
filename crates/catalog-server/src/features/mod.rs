//! Feature modules implementing the catalog API
//!
//! Each feature is a vertical slice:
//! - `commands/` - Write operations
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions
//!
//! # Features
//!
//! - **products**: Feed ingestion and product listing

pub mod products;
pub mod shared;

use axum::Router;
use catalog_ingest::feed::FeedFetcher;
use std::time::Duration;

use crate::{config::FeedFailurePolicy, storage::DynProductStore};

/// Per-request behaviour shared by every handler
#[derive(Debug, Clone, Copy)]
pub struct RequestSettings {
    /// Deadline for one whole API call
    pub rpc_timeout: Duration,
    pub feed_failure_policy: FeedFailurePolicy,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            rpc_timeout: Duration::from_secs(crate::config::DEFAULT_RPC_TIMEOUT_SECS),
            feed_failure_policy: FeedFailurePolicy::default(),
        }
    }
}

/// Shared state for all feature routes
///
/// Built once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct FeatureState {
    pub store: DynProductStore,
    /// Shared HTTP client for feed downloads
    pub fetcher: FeedFetcher,
    pub settings: RequestSettings,
}

/// Creates the API router with all feature routes mounted
///
/// - `/products` - Feed ingestion and listing
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/products", products::products_routes())
        .with_state(state)
}
