//! Common types used across the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Domain Types
// ============================================================================

/// A product as persisted in the catalog.
///
/// `name` is the business key: no two stored products share it. Every
/// reconciliation that touches a product bumps `price_change_count` by one
/// and stamps `last_update`, even when the price itself is unchanged.
///
/// # Examples
///
/// ```rust
/// use catalog_common::types::Product;
/// use chrono::Utc;
///
/// let product = Product {
///     name: "Widget".to_string(),
///     price: 9.99,
///     price_change_count: 1,
///     last_update: Utc::now(),
/// };
/// assert_eq!(product.price_change_count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product name
    pub name: String,

    /// Current price, always finite and non-negative
    pub price: f64,

    /// Number of reconciliations ever applied to this product
    pub price_change_count: i64,

    /// Time of the reconciliation that produced `price`
    pub last_update: DateTime<Utc>,
}

/// A single row parsed out of a price feed.
///
/// Records are never stored directly; they are the input of reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestedRecord {
    pub name: String,
    pub price: f64,
}

impl IngestedRecord {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

impl std::fmt::Display for IngestedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.name, self.price)
    }
}
