//! Feed domain model and the loader contracts the rest of the app depends on.
//!
//! The cache subsystem implements these contracts; remote loaders and the
//! presentation layer live elsewhere and only see these types.

use crate::error::{ImageLoadError, ImageSaveError, Result};
use bytes::Bytes;
use url::Url;
use uuid::Uuid;

/// A single image in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedImage {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

impl FeedImage {
    pub fn new(id: Uuid, description: Option<String>, location: Option<String>, url: Url) -> Self {
        Self {
            id,
            description,
            location,
            url,
        }
    }
}

pub type LoadFeedCompletion = Box<dyn FnOnce(Result<Vec<FeedImage>>) + Send>;
pub type SaveFeedCompletion = Box<dyn FnOnce(Result<()>) + Send>;
pub type LoadImageDataCompletion =
    Box<dyn FnOnce(std::result::Result<Bytes, ImageLoadError>) + Send>;
pub type SaveImageDataCompletion = Box<dyn FnOnce(std::result::Result<(), ImageSaveError>) + Send>;

/// Anything that can produce the current feed.
pub trait FeedLoader: Send + Sync {
    fn load(&self, completion: LoadFeedCompletion);
}

/// Anything that can persist a feed for later loads.
pub trait FeedCache: Send + Sync {
    fn save(&self, feed: Vec<FeedImage>, completion: SaveFeedCompletion);
}

/// Handle for an in-flight image data load.
pub trait FeedImageDataLoaderTask: Send + Sync {
    /// Suppress the pending completion. Idempotent.
    fn cancel(&self);
}

/// Anything that can produce image bytes for a URL.
pub trait FeedImageDataLoader: Send + Sync {
    fn load_image_data(
        &self,
        url: &Url,
        completion: LoadImageDataCompletion,
    ) -> Box<dyn FeedImageDataLoaderTask>;
}

/// Anything that can keep image bytes for a URL.
pub trait FeedImageDataCache: Send + Sync {
    fn save_image_data(&self, data: Bytes, url: &Url, completion: SaveImageDataCompletion);
}
