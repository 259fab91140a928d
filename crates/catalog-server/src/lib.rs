//! Catalog Server Library
//!
//! HTTP service that keeps a product catalog in sync with CSV price feeds.
//!
//! # Overview
//!
//! - **Ingest**: `POST /api/v1/products/fetch` downloads a feed and upserts
//!   every usable row, bumping each product's `price_change_count`
//! - **List**: `GET /api/v1/products` returns one page of products sorted by
//!   name (case-insensitive), price, change count or last update
//!
//! # Architecture
//!
//! - `features/` holds vertical slices with `commands/`, `queries/` and
//!   `routes.rs`
//! - `storage/` hides PostgreSQL (or the in-memory store) behind
//!   [`storage::ProductStore`]
//! - `config` reads the environment, `middleware` adds CORS and request
//!   tracing
//!
//! # Example
//!
//! ```no_run
//! use catalog_server::{api, config::Config, features, storage::MemoryProductStore};
//! use catalog_ingest::feed::FeedFetcher;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let state = features::FeatureState {
//!     store: Arc::new(MemoryProductStore::new()),
//!     fetcher: FeedFetcher::new(config.fetcher_config())?,
//!     settings: features::RequestSettings::default(),
//! };
//! let app = api::create_router(state, &config.cors);
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod middleware;
pub mod storage;

pub use error::AppError;
