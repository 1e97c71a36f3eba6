//! File-backed image data store.
//!
//! One file per URL inside a cache directory, named by the hex SHA-256 of the
//! URL string. Operations run on a private serial queue like the feed store.

use super::atomic::{atomic_write, read_if_exists, remove_if_exists};
use super::image_store::{FeedImageDataStore, ImageInsertionCompletion, ImageRetrievalCompletion};
use super::serial_queue::SerialQueue;
use crate::config::{PathsConfig, WorkerConfig};
use crate::error::Result;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Image data store keeping each blob in its own file.
pub struct FileFeedImageDataStore {
    cache_dir: Arc<PathBuf>,
    queue: SerialQueue,
}

impl FileFeedImageDataStore {
    /// Create a store over `cache_dir`. The directory is created on first insert.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            cache_dir: Arc::new(cache_dir.into()),
            queue: SerialQueue::new(WorkerConfig::IMAGE_STORE_THREAD_NAME)?,
        })
    }

    /// Create a store at `{cache_root}/image-data`.
    pub fn in_dir(cache_root: &Path) -> Result<Self> {
        Self::new(cache_root.join(PathsConfig::IMAGE_DATA_DIR_NAME))
    }

    /// Generate the file name for a URL.
    pub fn cache_key(url: &Url) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Remove the entry for `url`, if any.
    pub fn delete(&self, url: &Url, completion: impl FnOnce(Result<()>) + Send + 'static) {
        let path = self.cache_dir.join(Self::cache_key(url));
        self.queue.dispatch(move || {
            completion(remove_if_exists(&path).map(|removed| {
                if removed {
                    debug!("Removed image data at {}", path.display());
                }
            }))
        });
    }
}

impl FeedImageDataStore for FileFeedImageDataStore {
    fn insert(&self, data: Bytes, url: &Url, completion: ImageInsertionCompletion) {
        let path = self.cache_dir.join(Self::cache_key(url));
        self.queue.dispatch(move || {
            let result = atomic_write(&path, &data);
            if result.is_ok() {
                debug!("Stored {} bytes of image data at {}", data.len(), path.display());
            }
            completion(result)
        });
    }

    fn retrieve(&self, url: &Url, completion: ImageRetrievalCompletion) {
        let path = self.cache_dir.join(Self::cache_key(url));
        self.queue.dispatch(move || {
            completion(read_if_exists(&path).map(|found| found.map(Bytes::from)))
        });
    }
}
