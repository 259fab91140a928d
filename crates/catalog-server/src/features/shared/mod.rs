//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **pagination**: Validated page requests
//! - **sorting**: Sort field and direction parsing
//! - **validation**: Input validation utilities

pub mod pagination;
pub mod sorting;
pub mod validation;

pub use pagination::{PageRequest, PageValidationError, MAX_PAGE_SIZE};
pub use sorting::{SortField, SortOrder, SortSpec};
pub use validation::{validate_feed_url, UrlValidationError};
