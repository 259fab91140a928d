//! Catalog Ingest - price feed inspection tool
//!
//! Fetches or reads a price feed and reports what an ingestion would
//! reconcile, without touching storage.

use anyhow::{Context, Result};
use catalog_common::logging::{init_logging, LogConfig, LogLevel};
use catalog_ingest::feed::{parse_feed, FeedFetcher, FetcherConfig, ParsedFeed};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "catalog-ingest")]
#[command(author, version, about = "Price feed inspection tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (also logs every skipped row)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Download a feed over HTTP and preview the parsed records
    Preview {
        /// Feed URL
        #[arg(short, long)]
        url: String,

        /// Maximum number of records to log
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Request timeout in seconds
        #[arg(long, env = "CATALOG_FEED_TIMEOUT_SECS", default_value_t = 10)]
        timeout_secs: u64,
    },

    /// Parse a feed stored on disk
    Parse {
        /// Path to the CSV file
        #[arg(short, long)]
        file: String,

        /// Maximum number of records to log
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("catalog-ingest")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    match cli.command {
        Command::Preview {
            url,
            limit,
            timeout_secs,
        } => {
            info!(%url, "Fetching feed");
            let fetcher = FeedFetcher::new(FetcherConfig {
                timeout_secs,
                ..FetcherConfig::default()
            })?;
            let feed = fetcher.fetch(&url).await?;
            report(&feed, limit);
        },
        Command::Parse { file, limit } => {
            info!(%file, "Parsing feed file");
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read feed file '{}'", file))?;
            let feed = parse_feed(&data)?;
            report(&feed, limit);
        },
    }

    Ok(())
}

fn report(feed: &ParsedFeed, limit: usize) {
    for record in feed.records.iter().take(limit) {
        info!(name = %record.name, price = record.price, "Record");
    }
    if feed.records.len() > limit {
        info!(remaining = feed.records.len() - limit, "More records not shown");
    }
    for row in &feed.skipped {
        tracing::debug!(line = row.line, reason = %row.reason, "Skipped row");
    }

    info!(
        rows = feed.rows(),
        records = feed.records.len(),
        skipped = feed.skipped.len(),
        "Feed summary"
    );
}
