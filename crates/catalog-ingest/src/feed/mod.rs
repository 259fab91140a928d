//! Price feed retrieval and parsing
//!
//! - `fetcher`: HTTP download with size and time limits
//! - `parser`: CSV header resolution and per-row price policy

pub mod fetcher;
pub mod parser;

pub use fetcher::{FeedFetcher, FetcherConfig};
pub use parser::{parse_feed, ParsedFeed, SkipReason, SkippedRow, NAME_COLUMN, PRICE_COLUMN};

/// Result type for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Errors that fail a whole feed
///
/// Problems with individual rows never surface here; they end up in
/// [`ParsedFeed::skipped`].
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Feed request returned HTTP {status}")]
    HttpStatus { status: reqwest::StatusCode },

    #[error("Feed body exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("Feed is empty: no header row")]
    EmptyFeed,

    #[error("Feed header is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Malformed feed: {0}")]
    Malformed(#[from] csv::Error),

    #[error("Invalid fetcher configuration: {0}")]
    Config(String),
}
