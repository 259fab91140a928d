//! Fetch products command
//!
//! Downloads a price feed and reconciles every usable row into the catalog.
//!
//! # Architecture
//!
//! - Command: the feed location, validated before anything runs
//! - Handler: downloads, parses, then upserts records one at a time in
//!   feed order under the per-request deadline

use catalog_common::IngestedRecord;
use catalog_ingest::feed::FeedError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::{
    config::FeedFailurePolicy,
    features::{
        shared::validation::{validate_feed_url, UrlValidationError},
        FeatureState,
    },
    storage::{ProductStore, StoreError},
};

/// Command to ingest a price feed
///
/// # Examples
///
/// ```rust
/// use catalog_server::features::products::FetchProductsCommand;
///
/// let command = FetchProductsCommand {
///     url: "https://example.com/prices.csv".to_string(),
/// };
/// assert!(command.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchProductsCommand {
    /// Location of a CSV feed with `product_name` and `price` columns
    pub url: String,
}

/// Summary of a finished ingest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchProductsResponse {
    /// Data rows found in the feed
    pub records_received: usize,
    /// Rows dropped by the price policy
    pub records_skipped: usize,
    /// Upserts applied
    pub products_reconciled: usize,
}

/// Errors that can occur when ingesting a feed
#[derive(Debug, thiserror::Error)]
pub enum FetchProductsError {
    #[error("URL validation failed: {0}")]
    UrlValidation(#[from] UrlValidationError),

    #[error("Failed to fetch feed: {0}")]
    Feed(#[from] FeedError),

    #[error("Failed to store product '{name}' (record {index}, {applied} already applied): {source}")]
    Store {
        name: String,
        index: usize,
        applied: usize,
        #[source]
        source: StoreError,
    },

    #[error("Ingest did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

impl FetchProductsCommand {
    /// Validates the feed location
    ///
    /// # Errors
    ///
    /// The URL must be non-blank, at most 2048 characters, and an absolute
    /// `http`/`https` URL with a host.
    pub fn validate(&self) -> Result<Url, FetchProductsError> {
        Ok(validate_feed_url(&self.url)?)
    }
}

/// Handler function for ingesting a feed
///
/// Validation failures return before any network or storage work. The
/// deadline covers download and reconciliation together; upserts applied
/// before it expires stay applied.
#[tracing::instrument(skip(state, command), fields(url = %command.url))]
pub async fn handle(
    state: FeatureState,
    command: FetchProductsCommand,
) -> Result<FetchProductsResponse, FetchProductsError> {
    let url = command.validate()?;
    let deadline = state.settings.rpc_timeout;

    tokio::time::timeout(deadline, ingest(&state, &url))
        .await
        .map_err(|_| {
            tracing::warn!(?deadline, "Ingest deadline exceeded");
            FetchProductsError::DeadlineExceeded(deadline)
        })?
}

async fn ingest(state: &FeatureState, url: &Url) -> Result<FetchProductsResponse, FetchProductsError> {
    tracing::info!("Fetching product feed");

    let feed = match state.fetcher.fetch(url.as_str()).await {
        Ok(feed) => feed,
        Err(e) => match state.settings.feed_failure_policy {
            FeedFailurePolicy::Fail => {
                tracing::error!(error = %e, "Feed fetch failed");
                return Err(e.into());
            },
            FeedFailurePolicy::Skip => {
                tracing::warn!(error = %e, "Feed fetch failed, nothing to reconcile");
                return Ok(FetchProductsResponse::default());
            },
        },
    };

    let reconciled = reconcile(state.store.as_ref(), &feed.records).await?;

    let response = FetchProductsResponse {
        records_received: feed.rows(),
        records_skipped: feed.skipped.len(),
        products_reconciled: reconciled,
    };

    tracing::info!(
        received = response.records_received,
        skipped = response.records_skipped,
        reconciled = response.products_reconciled,
        "Product feed ingested"
    );

    Ok(response)
}

/// Apply records in order, stopping at the first storage failure
///
/// Returns the number of upserts applied. Records before a failure are
/// not rolled back.
pub async fn reconcile(
    store: &dyn ProductStore,
    records: &[IngestedRecord],
) -> Result<usize, FetchProductsError> {
    for (index, record) in records.iter().enumerate() {
        if let Err(source) = store.upsert_price(record, Utc::now()).await {
            tracing::error!(
                name = %record.name,
                index,
                applied = index,
                error = %source,
                "Reconciliation aborted"
            );
            return Err(FetchProductsError::Store {
                name: record.name.clone(),
                index,
                applied: index,
                source,
            });
        }
    }

    Ok(records.len())
}
