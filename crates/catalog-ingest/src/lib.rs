//! Catalog Ingest Library
//!
//! Retrieves product price feeds and turns them into [`IngestedRecord`]s.
//!
//! A feed is delimited text with a header row naming at least a
//! `product_name` and a `price` column (matched case-insensitively). Rows
//! whose price is not a usable number are skipped rather than failing the
//! whole feed.
//!
//! # Example
//!
//! ```no_run
//! use catalog_ingest::feed::{FeedFetcher, FetcherConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = FeedFetcher::new(FetcherConfig::default())?;
//!     let feed = fetcher.fetch("https://example.com/prices.csv").await?;
//!     tracing::info!(records = feed.records.len(), skipped = feed.skipped.len(), "Feed parsed");
//!     Ok(())
//! }
//! ```
//!
//! [`IngestedRecord`]: catalog_common::IngestedRecord

pub mod feed;
