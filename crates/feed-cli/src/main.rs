//! Feed cache maintenance tool.
//!
//! Inspects, validates or clears the feed snapshot kept under a cache
//! directory by `feed-core`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use feed_core::completion::{wait_for, wait_for_result};
use feed_core::{
    CacheConfig, CodableFeedStore, FeedCachePolicy, FeedStore, LocalFeedLoader, RetrievalResult,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "feed-cache")]
#[command(about = "Inspect and maintain the local feed cache")]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Directory holding the feed store
    #[arg(long)]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print what the cache holds without modifying it
    Inspect {
        /// Freshness window in days
        #[arg(long, default_value_t = CacheConfig::DEFAULT_MAX_AGE_DAYS)]
        max_age_days: u64,
    },
    /// Delete the cache if it is expired or unreadable
    Validate {
        /// Freshness window in days
        #[arg(long, default_value_t = CacheConfig::DEFAULT_MAX_AGE_DAYS)]
        max_age_days: u64,
    },
    /// Delete the cached feed
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Feed cache directory: {}", args.cache_dir.display());
    let store = Arc::new(
        CodableFeedStore::in_dir(&args.cache_dir).context("Failed to open feed store")?,
    );

    match args.command {
        Command::Inspect { max_age_days } => {
            let policy = FeedCachePolicy::with_max_age_days(max_age_days);
            let cached = wait_for(|done| store.retrieve(done))
                .await?
                .with_context(|| format!("Failed to read {}", store.store_path().display()))?;
            match cached {
                Some(cached) => {
                    let now = Utc::now();
                    println!("items:     {}", cached.feed.len());
                    println!("timestamp: {}", cached.timestamp.to_rfc3339());
                    println!("age:       {}", describe_age(cached.timestamp, now));
                    match policy.expires_at(cached.timestamp) {
                        Some(expires_at) => println!("expires:   {}", expires_at.to_rfc3339()),
                        None => println!("expires:   unrepresentable"),
                    }
                    println!(
                        "fresh:     {}",
                        if policy.validate(cached.timestamp, now) {
                            "yes"
                        } else {
                            "no"
                        }
                    );
                }
                None => println!("cache is empty"),
            }
        }
        Command::Validate { max_age_days } => {
            let loader = Arc::new(LocalFeedLoader::with_policy(
                store.clone(),
                Utc::now,
                FeedCachePolicy::with_max_age_days(max_age_days),
            ));
            wait_for_result(|done| loader.validate_cache(done))
                .await
                .context("Cache validation failed")?;
            let remaining = wait_for(|done| store.retrieve(done)).await?;
            println!("{}", describe_remaining(remaining)?);
        }
        Command::Clear => {
            wait_for_result(|done| store.delete_cached_feed(done))
                .await
                .context("Failed to clear feed cache")?;
            println!("cache cleared");
        }
    }

    Ok(())
}

/// Outcome line for `validate`. A cache that cannot be read back is an error,
/// never an empty cache.
fn describe_remaining(remaining: RetrievalResult) -> Result<&'static str> {
    match remaining.context("Failed to re-read the feed store after validation")? {
        Some(_) => Ok("cache is fresh"),
        None => Ok("cache is empty"),
    }
}

/// Human-readable age of a snapshot, e.g. `2d 3h 15m`.
fn describe_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(timestamp);
    if age < chrono::Duration::zero() {
        return "in the future".to_string();
    }
    let days = age.num_days();
    let hours = age.num_hours() % 24;
    let minutes = age.num_minutes() % 60;
    format!("{}d {}h {}m", days, hours, minutes)
}
