//! Feed store contract and the record types it speaks.

use crate::error::Result;
use crate::feed::FeedImage;
use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

/// The store's representation of a feed image.
///
/// Kept separate from [`FeedImage`] so the persisted shape can evolve
/// independently of the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalFeedImage {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

impl From<&FeedImage> for LocalFeedImage {
    fn from(image: &FeedImage) -> Self {
        Self {
            id: image.id,
            description: image.description.clone(),
            location: image.location.clone(),
            url: image.url.clone(),
        }
    }
}

impl From<LocalFeedImage> for FeedImage {
    fn from(local: LocalFeedImage) -> Self {
        FeedImage {
            id: local.id,
            description: local.description,
            location: local.location,
            url: local.url,
        }
    }
}

/// The single snapshot a store holds: ordered records plus the time they were saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFeed {
    pub feed: Vec<LocalFeedImage>,
    pub timestamp: DateTime<Utc>,
}

/// `Ok(None)` is an empty store, `Ok(Some(_))` a found snapshot.
pub type RetrievalResult = Result<Option<CachedFeed>>;
pub type InsertionResult = Result<()>;
pub type DeletionResult = Result<()>;

pub type RetrievalCompletion = Box<dyn FnOnce(RetrievalResult) + Send>;
pub type InsertionCompletion = Box<dyn FnOnce(InsertionResult) + Send>;
pub type DeletionCompletion = Box<dyn FnOnce(DeletionResult) + Send>;

/// Persistence contract for the feed snapshot.
///
/// Every operation reports through its completion exactly once, possibly on
/// another thread. Implementations never panic or fail synchronously; all
/// failures arrive as `Err` in the completion.
pub trait FeedStore: Send + Sync {
    /// Remove the snapshot. Deleting an empty store succeeds.
    fn delete_cached_feed(&self, completion: DeletionCompletion);

    /// Replace any existing snapshot with `feed` taken at `timestamp`.
    fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    );

    /// Read the snapshot without side effects.
    fn retrieve(&self, completion: RetrievalCompletion);
}
