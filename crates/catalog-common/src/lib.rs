//! Catalog Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the catalog workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all catalog workspace members:
//!
//! - **Error Handling**: Common error type and result alias
//! - **Logging**: Centralized `tracing` subscriber setup
//! - **Types**: Shared domain types (`Product`, `IngestedRecord`)
//!
//! # Example
//!
//! ```no_run
//! use catalog_common::logging::{init_logging, LogConfig};
//! use catalog_common::types::IngestedRecord;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&LogConfig::from_env()?)?;
//!     let record = IngestedRecord::new("Widget", 9.99);
//!     tracing::info!(name = %record.name, price = record.price, "parsed record");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CatalogError, Result};
pub use types::{IngestedRecord, Product};
