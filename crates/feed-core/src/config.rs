//! Centralized configuration for the feed cache.
//!
//! Holds the constants shared by the cache policy, the file-backed stores and
//! the maintenance CLI.

use std::time::Duration;

/// Cache behaviour defaults.
pub struct CacheConfig;

impl CacheConfig {
    /// Snapshots older than this are never returned as valid data.
    pub const DEFAULT_MAX_AGE_DAYS: u64 = 7;
    pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(Self::DEFAULT_MAX_AGE_DAYS * 86_400);

    /// Highest snapshot format version this build can read. Written into every snapshot.
    pub const SNAPSHOT_VERSION: u32 = 1;
}

/// File and directory names inside a cache root.
pub struct PathsConfig;

impl PathsConfig {
    pub const FEED_STORE_FILE_NAME: &'static str = "feed-store.json";
    pub const IMAGE_DATA_DIR_NAME: &'static str = "image-data";
    pub const TEMP_SUFFIX: &'static str = "tmp";
}

/// Worker thread naming.
pub struct WorkerConfig;

impl WorkerConfig {
    pub const FEED_STORE_THREAD_NAME: &'static str = "feed-store";
    pub const IMAGE_STORE_THREAD_NAME: &'static str = "image-data-store";
}
