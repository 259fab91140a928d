//! Shared pagination utilities
//!
//! Pages are 1-based and sized by the caller. Responses carry no total
//! count: a page shorter than `page_size` marks the end of the data.
//!
//! # Examples
//!
//! ```rust
//! use catalog_server::features::shared::pagination::PageRequest;
//!
//! let page = PageRequest::new(3, 2).unwrap();
//! assert_eq!(page.offset(), 4);
//! assert_eq!(page.limit(), 2);
//! ```

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Errors produced when page bounds are out of range
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PageValidationError {
    #[error("page_number must be greater than 0")]
    InvalidPageNumber,

    #[error("page_size must be between 1 and {max}")]
    InvalidPageSize { max: i64 },
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: i64,
    page_size: i64,
}

impl PageRequest {
    /// Build a page request, rejecting non-positive numbers and oversized pages
    pub fn new(page_number: i64, page_size: i64) -> Result<Self, PageValidationError> {
        if page_number < 1 {
            return Err(PageValidationError::InvalidPageNumber);
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(PageValidationError::InvalidPageSize { max: MAX_PAGE_SIZE });
        }
        Ok(Self {
            page_number,
            page_size,
        })
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    /// Rows to skip: `(page_number - 1) * page_size`
    ///
    /// Saturates instead of overflowing for absurd page numbers; such pages
    /// are simply empty.
    pub fn offset(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}
