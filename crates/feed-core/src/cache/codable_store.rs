//! File-backed feed store.
//!
//! Persists the feed snapshot as one JSON document at a caller-supplied path.
//! All operations run on a private [`SerialQueue`], so concurrent callers get
//! their completions in issue order and never observe a write in progress.

use super::atomic::{atomic_write, read_if_exists, remove_if_exists};
use super::feed_store::{
    CachedFeed, DeletionCompletion, DeletionResult, FeedStore, InsertionCompletion,
    InsertionResult, LocalFeedImage, RetrievalCompletion, RetrievalResult,
};
use super::serial_queue::SerialQueue;
use crate::config::{CacheConfig, PathsConfig, WorkerConfig};
use crate::error::{FeedCacheError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// On-disk snapshot (the JSON root object).
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default = "unversioned")]
    version: u32,
    feed: Vec<CodableFeedImage>,
    timestamp: DateTime<Utc>,
}

/// Snapshots written before the version header existed are version 1.
fn unversioned() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct VersionProbe {
    #[serde(default = "unversioned")]
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct CodableFeedImage {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    url: Url,
}

impl From<&LocalFeedImage> for CodableFeedImage {
    fn from(image: &LocalFeedImage) -> Self {
        Self {
            id: image.id,
            description: image.description.clone(),
            location: image.location.clone(),
            url: image.url.clone(),
        }
    }
}

impl From<CodableFeedImage> for LocalFeedImage {
    fn from(image: CodableFeedImage) -> Self {
        LocalFeedImage {
            id: image.id,
            description: image.description,
            location: image.location,
            url: image.url,
        }
    }
}

/// Serialize a feed snapshot to the on-disk format.
pub fn encode_snapshot(feed: &[LocalFeedImage], timestamp: DateTime<Utc>) -> Result<Vec<u8>> {
    let snapshot = Snapshot {
        version: CacheConfig::SNAPSHOT_VERSION,
        feed: feed.iter().map(CodableFeedImage::from).collect(),
        timestamp,
    };
    serde_json::to_vec(&snapshot).map_err(|e| FeedCacheError::Encode {
        message: format!("Failed to serialize snapshot: {}", e),
        source: Some(e),
    })
}

/// Parse the on-disk format back into a [`CachedFeed`].
pub fn decode_snapshot(bytes: &[u8]) -> Result<CachedFeed> {
    let probe: VersionProbe = serde_json::from_slice(bytes)?;
    if probe.version > CacheConfig::SNAPSHOT_VERSION {
        return Err(FeedCacheError::UnsupportedVersion {
            found: probe.version,
            supported: CacheConfig::SNAPSHOT_VERSION,
        });
    }

    let snapshot: Snapshot = serde_json::from_slice(bytes)?;
    Ok(CachedFeed {
        feed: snapshot.feed.into_iter().map(LocalFeedImage::from).collect(),
        timestamp: snapshot.timestamp,
    })
}

/// Feed store persisting to a single JSON file.
pub struct CodableFeedStore {
    store_path: Arc<PathBuf>,
    queue: SerialQueue,
}

impl CodableFeedStore {
    /// Create a store that owns the file at `store_path`.
    ///
    /// The file is not touched until the first operation runs.
    pub fn new(store_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            store_path: Arc::new(store_path.into()),
            queue: SerialQueue::new(WorkerConfig::FEED_STORE_THREAD_NAME)?,
        })
    }

    /// Create a store at `{cache_dir}/feed-store.json`.
    pub fn in_dir(cache_dir: &Path) -> Result<Self> {
        Self::new(cache_dir.join(PathsConfig::FEED_STORE_FILE_NAME))
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}

impl FeedStore for CodableFeedStore {
    fn delete_cached_feed(&self, completion: DeletionCompletion) {
        let path = Arc::clone(&self.store_path);
        self.queue.dispatch(move || completion(delete_at(&path)));
    }

    fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    ) {
        let path = Arc::clone(&self.store_path);
        self.queue.dispatch(move || completion(insert_at(&path, &feed, timestamp)));
    }

    fn retrieve(&self, completion: RetrievalCompletion) {
        let path = Arc::clone(&self.store_path);
        self.queue.dispatch(move || completion(retrieve_at(&path)));
    }
}

fn retrieve_at(path: &Path) -> RetrievalResult {
    let Some(bytes) = read_if_exists(path)? else {
        debug!("No feed snapshot at {}", path.display());
        return Ok(None);
    };

    let cached = decode_snapshot(&bytes)?;
    debug!(
        "Retrieved {} cached images from {}",
        cached.feed.len(),
        path.display()
    );
    Ok(Some(cached))
}

fn insert_at(path: &Path, feed: &[LocalFeedImage], timestamp: DateTime<Utc>) -> InsertionResult {
    let bytes = encode_snapshot(feed, timestamp)?;
    atomic_write(path, &bytes)?;
    debug!("Inserted {} images into {}", feed.len(), path.display());
    Ok(())
}

fn delete_at(path: &Path) -> DeletionResult {
    if remove_if_exists(path)? {
        debug!("Deleted feed snapshot at {}", path.display());
    }
    Ok(())
}
