//! Product persistence
//!
//! Feature handlers talk to storage only through [`ProductStore`], so the
//! same reconciliation and listing code runs against PostgreSQL in
//! production and against [`MemoryProductStore`] in tests and local runs.

use async_trait::async_trait;
use catalog_common::{CatalogError, IngestedRecord, Product};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::features::shared::{PageRequest, SortSpec};

pub mod memory;
pub mod postgres;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by a product store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Collator unavailable: {0}")]
    Collation(#[from] icu_collator::CollatorError),

    #[error("Refusing to store '{name}' with price {price}")]
    InvalidRecord { name: String, price: f64 },
}

/// Which [`ProductStore`] implementation backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(CatalogError::Config(format!(
                "unknown storage backend '{}', expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering and window for a product listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub sort: SortSpec,
    pub page: PageRequest,
}

/// Durable owner of the product catalog
#[async_trait]
pub trait ProductStore: Send + Sync {
    fn backend(&self) -> StorageBackend;

    /// Atomically reconcile one record into the catalog
    ///
    /// Creates the product with `price_change_count = 1` when the name is
    /// new. Otherwise replaces the price, stamps `at` as `last_update` and
    /// increments the counter. Concurrent calls for the same name never
    /// lose an increment.
    async fn upsert_price(&self, record: &IngestedRecord, at: DateTime<Utc>) -> StoreResult<Product>;

    /// Return one page of products in the requested order
    ///
    /// Ties on the sort field are broken by the byte-wise name so that
    /// consecutive pages never overlap or skip items.
    async fn list(&self, params: &ListParams) -> StoreResult<Vec<Product>>;

    /// Cheap liveness probe used by the health endpoint
    async fn ping(&self) -> StoreResult<()>;
}

/// Shared handle to the configured store
pub type DynProductStore = Arc<dyn ProductStore>;

/// Reject records that would break the product invariants
pub(crate) fn check_record(record: &IngestedRecord) -> StoreResult<()> {
    if record.name.trim().is_empty() || !record.price.is_finite() || record.price < 0.0 {
        return Err(StoreError::InvalidRecord {
            name: record.name.clone(),
            price: record.price,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("postgres".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert_eq!("PostgreSQL".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert_eq!(" memory ".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!(matches!(
            "mongo".parse::<StorageBackend>(),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn test_check_record() {
        assert!(check_record(&IngestedRecord::new("Widget", 9.99)).is_ok());
        assert!(check_record(&IngestedRecord::new("  ", 9.99)).is_err());
        assert!(check_record(&IngestedRecord::new("Widget", -1.0)).is_err());
        assert!(check_record(&IngestedRecord::new("Widget", f64::NAN)).is_err());
        assert!(check_record(&IngestedRecord::new("Widget", f64::INFINITY)).is_err());
    }
}
