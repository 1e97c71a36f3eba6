//! Feed Core - local cache subsystem for the feed client.
//!
//! Provides the policy layer that decides when cached feed data is valid, the
//! persistence contracts it depends on, a file-backed store with serialized
//! operations, and a cache-aside path for image bytes.
//!
//! All operations are callback based. Completions fire exactly once, possibly
//! on a store worker thread, and never after the issuing loader was dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use feed_core::{completion::wait_for_result, CodableFeedStore, LocalFeedLoader};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> feed_core::Result<()> {
//!     let store = Arc::new(CodableFeedStore::in_dir("/path/to/cache".as_ref())?);
//!     let loader = Arc::new(LocalFeedLoader::new(store, chrono::Utc::now));
//!
//!     loader.validate_cache(|result| {
//!         if let Err(e) = result {
//!             eprintln!("cache validation failed: {}", e);
//!         }
//!     });
//!
//!     let feed = wait_for_result(|done| loader.load(done)).await?;
//!     println!("{} cached images", feed.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cancel;
pub mod completion;
pub mod config;
pub mod error;
pub mod feed;

// Re-export commonly used types
pub use cache::{
    CachedFeed, CodableFeedStore, FeedCachePolicy, FeedImageDataStore, FeedStore,
    FileFeedImageDataStore, LoadImageDataTask, LocalFeedImage, LocalFeedImageLoader,
    LocalFeedLoader, RetrievalResult,
};
pub use cancel::CancellableCompletion;
pub use config::{CacheConfig, PathsConfig};
pub use error::{FeedCacheError, ImageLoadError, ImageSaveError, Result};
pub use feed::{
    FeedCache, FeedImage, FeedImageDataCache, FeedImageDataLoader, FeedImageDataLoaderTask,
    FeedLoader,
};
