//! Configuration management

use catalog_common::CatalogError;
use catalog_ingest::feed::FetcherConfig;
use serde::{Deserialize, Serialize};
use std::{str::FromStr, time::Duration};

use crate::storage::StorageBackend;

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 50051;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default deadline for a single API call in seconds.
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/catalog";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// What an ingest does when the feed cannot be downloaded or parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFailurePolicy {
    /// Report the failure to the caller as an internal error
    #[default]
    Fail,
    /// Log the failure and treat the feed as empty
    Skip,
}

impl FromStr for FeedFailurePolicy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(FeedFailurePolicy::Fail),
            "skip" => Ok(FeedFailurePolicy::Skip),
            other => Err(CatalogError::Config(format!(
                "unknown feed failure policy '{}', expected 'fail' or 'skip'",
                other
            ))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub feed: FeedConfig,
    pub cors: CorsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    pub rpc_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Price feed download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub timeout_secs: u64,
    pub max_body_bytes: usize,
    pub failure_policy: FeedFailurePolicy,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Read a numeric variable, falling back to `default` when unset or unparseable
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Read an enum variable; unlike numbers, an unknown value is an error
fn env_choice<T>(key: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = CatalogError> + Default,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => Ok(raw.parse()?),
        _ => Ok(T::default()),
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = FetcherConfig::default();

        let config = Config {
            server: ServerConfig {
                host: std::env::var("CATALOG_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env_or("CATALOG_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_or(
                    "CATALOG_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
                rpc_timeout_secs: env_or("CATALOG_RPC_TIMEOUT_SECS", DEFAULT_RPC_TIMEOUT_SECS),
            },
            storage: StorageConfig {
                backend: env_choice("CATALOG_STORAGE_BACKEND")?,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: env_or(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                ),
                min_connections: env_or(
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                ),
                connect_timeout_secs: env_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
                idle_timeout_secs: env_or(
                    "DATABASE_IDLE_TIMEOUT",
                    DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
                ),
            },
            feed: FeedConfig {
                timeout_secs: env_or("CATALOG_FEED_TIMEOUT_SECS", defaults.timeout_secs),
                max_body_bytes: env_or("CATALOG_FEED_MAX_BYTES", defaults.max_body_bytes),
                failure_policy: env_choice("CATALOG_FEED_FAILURE_POLICY")?,
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", true),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.rpc_timeout_secs == 0 {
            anyhow::bail!("RPC timeout must be greater than 0");
        }

        if self.storage.backend == StorageBackend::Postgres {
            if self.database.url.is_empty() {
                anyhow::bail!("Database URL cannot be empty");
            }

            if self.database.max_connections == 0 {
                anyhow::bail!("Database max_connections must be greater than 0");
            }

            if self.database.min_connections > self.database.max_connections {
                anyhow::bail!(
                    "Database min_connections ({}) cannot be greater than max_connections ({})",
                    self.database.min_connections,
                    self.database.max_connections
                );
            }
        }

        self.fetcher_config()
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid feed configuration: {}", e))?;

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.server.rpc_timeout_secs)
    }

    /// Settings for the shared feed fetcher
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout_secs: self.feed.timeout_secs,
            max_body_bytes: self.feed.max_body_bytes,
            ..FetcherConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let fetcher = FetcherConfig::default();

        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            },
            storage: StorageConfig {
                backend: StorageBackend::default(),
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
            },
            feed: FeedConfig {
                timeout_secs: fetcher.timeout_secs,
                max_body_bytes: fetcher.max_body_bytes,
                failure_policy: FeedFailurePolicy::default(),
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
        }
    }
}
