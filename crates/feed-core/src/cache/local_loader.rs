//! Cache policy layer: save, load and validate the feed snapshot.
//!
//! `LocalFeedLoader` never touches the filesystem. It talks to a
//! [`FeedStore`] and reads time only through the injected `current_date`
//! function, so freshness decisions are deterministic under test.
//!
//! Every pending store callback holds a `Weak` back-reference to the loader.
//! If the loader is gone by the time the store answers, the callback does
//! nothing and the caller's completion is never invoked.

use super::feed_store::{FeedStore, LocalFeedImage};
use super::policy::FeedCachePolicy;
use crate::error::Result;
use crate::feed::{FeedCache, FeedImage, FeedLoader, LoadFeedCompletion, SaveFeedCompletion};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Clock injected into the loader.
pub type CurrentDate = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Cache policy over a [`FeedStore`].
///
/// Operations take `self: &Arc<Self>`; keep the loader in an `Arc` and drop
/// it to cancel every pending completion.
pub struct LocalFeedLoader {
    store: Arc<dyn FeedStore>,
    current_date: CurrentDate,
    policy: FeedCachePolicy,
}

impl LocalFeedLoader {
    /// Create a loader with the default seven-day freshness window.
    pub fn new(
        store: Arc<dyn FeedStore>,
        current_date: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        Self::with_policy(store, current_date, FeedCachePolicy::default())
    }

    /// Create a loader with a custom freshness policy.
    pub fn with_policy(
        store: Arc<dyn FeedStore>,
        current_date: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
        policy: FeedCachePolicy,
    ) -> Self {
        Self {
            store,
            current_date: Arc::new(current_date),
            policy,
        }
    }

    /// Replace the cached feed.
    ///
    /// Deletes the current snapshot first. If that fails the error is
    /// delivered and no insert is attempted.
    pub fn save(
        self: &Arc<Self>,
        feed: Vec<FeedImage>,
        completion: impl FnOnce(Result<()>) + Send + 'static,
    ) {
        let weak = Arc::downgrade(self);
        self.store.delete_cached_feed(Box::new(move |deletion| {
            let Some(this) = weak.upgrade() else {
                return;
            };
            match deletion {
                Ok(()) => this.cache(feed, completion),
                Err(e) => {
                    debug!("Skipping insert, deleting the old feed failed: {}", e);
                    completion(Err(e));
                }
            }
        }));
    }

    fn cache(
        self: &Arc<Self>,
        feed: Vec<FeedImage>,
        completion: impl FnOnce(Result<()>) + Send + 'static,
    ) {
        let weak = Arc::downgrade(self);
        let local: Vec<LocalFeedImage> = feed.iter().map(LocalFeedImage::from).collect();
        let count = local.len();
        let timestamp = (self.current_date)();

        self.store.insert(
            local,
            timestamp,
            Box::new(move |insertion| {
                if is_gone(&weak) {
                    return;
                }
                if insertion.is_ok() {
                    debug!("Cached {} feed images at {}", count, timestamp);
                }
                completion(insertion);
            }),
        );
    }

    /// Load the cached feed if it is still fresh.
    ///
    /// An empty or expired cache yields `Ok(vec![])`. A store failure,
    /// corrupt data included, is delivered as `Err`. Never mutates the store.
    pub fn load(
        self: &Arc<Self>,
        completion: impl FnOnce(Result<Vec<FeedImage>>) + Send + 'static,
    ) {
        let weak = Arc::downgrade(self);
        self.store.retrieve(Box::new(move |retrieval| {
            let Some(this) = weak.upgrade() else {
                return;
            };
            match retrieval {
                Err(e) => completion(Err(e)),
                Ok(Some(cache)) if this.is_fresh(cache.timestamp) => {
                    completion(Ok(cache.feed.into_iter().map(FeedImage::from).collect()))
                }
                Ok(_) => completion(Ok(Vec::new())),
            }
        }));
    }

    /// Purge the snapshot if it is unreadable or expired.
    ///
    /// Completes with the outcome of the delete when one is issued, and with
    /// `Ok(())` when the cache is empty or fresh.
    pub fn validate_cache(
        self: &Arc<Self>,
        completion: impl FnOnce(Result<()>) + Send + 'static,
    ) {
        let weak = Arc::downgrade(self);
        self.store.retrieve(Box::new(move |retrieval| {
            let Some(this) = weak.upgrade() else {
                return;
            };
            match retrieval {
                Err(e) => {
                    warn!("Cached feed is unreadable, deleting it: {}", e);
                    this.delete_cache(completion);
                }
                Ok(Some(cache)) if !this.is_fresh(cache.timestamp) => {
                    warn!("Cached feed from {} has expired, deleting it", cache.timestamp);
                    this.delete_cache(completion);
                }
                Ok(_) => completion(Ok(())),
            }
        }));
    }

    fn delete_cache(self: &Arc<Self>, completion: impl FnOnce(Result<()>) + Send + 'static) {
        let weak = Arc::downgrade(self);
        self.store.delete_cached_feed(Box::new(move |deletion| {
            if is_gone(&weak) {
                return;
            }
            completion(deletion);
        }));
    }

    fn is_fresh(&self, timestamp: DateTime<Utc>) -> bool {
        self.policy.validate(timestamp, (self.current_date)())
    }
}

fn is_gone(weak: &Weak<LocalFeedLoader>) -> bool {
    weak.strong_count() == 0
}

impl FeedLoader for Arc<LocalFeedLoader> {
    fn load(&self, completion: LoadFeedCompletion) {
        LocalFeedLoader::load(self, completion);
    }
}

impl FeedCache for Arc<LocalFeedLoader> {
    fn save(&self, feed: Vec<FeedImage>, completion: SaveFeedCompletion) {
        LocalFeedLoader::save(self, feed, completion);
    }
}
