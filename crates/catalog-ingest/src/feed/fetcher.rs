//! HTTP feed fetcher

use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use super::{parse_feed, FeedError, ParsedFeed, Result};

/// Default request timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Default upper bound on a feed body (32 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Whole-request timeout
    pub timeout_secs: u64,

    /// Bodies larger than this fail with [`FeedError::TooLarge`]
    pub max_body_bytes: usize,

    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: format!("catalog-ingest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetcherConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be greater than 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Downloads and parses price feeds
///
/// Holds one connection-pooling HTTP client; clone it freely, clones share
/// the pool.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    config: FetcherConfig,
}

impl FeedFetcher {
    /// Create a new fetcher
    pub fn new(config: FetcherConfig) -> Result<Self> {
        config.validate().map_err(FeedError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    /// Download `url` and parse it as a price feed
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        let body = self.download(url).await?;
        let feed = parse_feed(&body)?;

        info!(
            bytes = body.len(),
            records = feed.records.len(),
            skipped = feed.skipped.len(),
            "Feed parsed"
        );

        Ok(feed)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Feed request was not successful");
            return Err(FeedError::HttpStatus { status });
        }

        let limit = self.config.max_body_bytes;
        if let Some(length) = response.content_length() {
            if length > limit as u64 {
                return Err(FeedError::TooLarge { limit });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(FeedError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_common::IngestedRecord;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn serve(body: &str, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prices.csv"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_invalid_config() {
        let config = FetcherConfig {
            timeout_secs: 0,
            ..FetcherConfig::default()
        };
        assert!(matches!(FeedFetcher::new(config), Err(FeedError::Config(_))));
    }

    #[tokio::test]
    async fn test_fetch_parses_feed() {
        let server = serve("product_name,price\nWidget,9.99\nGadget,0\nGizmo,abc\n", 200).await;
        let fetcher = FeedFetcher::new(FetcherConfig::default()).unwrap();

        let feed = fetcher
            .fetch(&format!("{}/prices.csv", server.uri()))
            .await
            .unwrap();

        assert_eq!(feed.records, vec![IngestedRecord::new("Widget", 9.99)]);
        assert_eq!(feed.skipped.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = serve("gone", 404).await;
        let fetcher = FeedFetcher::new(FetcherConfig::default()).unwrap();

        let err = fetcher
            .fetch(&format!("{}/prices.csv", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FeedError::HttpStatus { status } if status == reqwest::StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn test_fetch_body_too_large() {
        let server = serve("product_name,price\nWidget,9.99\n", 200).await;
        let fetcher = FeedFetcher::new(FetcherConfig {
            max_body_bytes: 8,
            ..FetcherConfig::default()
        })
        .unwrap();

        let err = fetcher
            .fetch(&format!("{}/prices.csv", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FeedError::TooLarge { limit: 8 }));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let fetcher = FeedFetcher::new(FetcherConfig::default()).unwrap();

        let err = fetcher.fetch("http://127.0.0.1:1/prices.csv").await.unwrap_err();

        assert!(matches!(err, FeedError::Request(_)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_feed() {
        let server = serve("sku,cost\n1,2\n", 200).await;
        let fetcher = FeedFetcher::new(FetcherConfig::default()).unwrap();

        let err = fetcher
            .fetch(&format!("{}/prices.csv", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FeedError::MissingColumn(_)));
    }
}
