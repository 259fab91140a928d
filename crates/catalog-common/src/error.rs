//! Error types shared across the catalog workspace

use thiserror::Error;

/// Result type alias for common catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Main error type for values shared between crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
