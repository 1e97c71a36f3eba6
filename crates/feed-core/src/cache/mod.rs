//! Local cache subsystem.
//!
//! - `feed_store` / `image_store`: persistence contracts the policy layer depends on
//! - `codable_store` / `file_image_store`: file-backed implementations
//! - `local_loader`: feed cache policy (save, load, validate)
//! - `image_loader`: image data cache-aside with cancellable loads
//!
//! Stores serialize every operation on their own worker thread, so there is
//! exactly one writer per store instance.

mod atomic;
mod codable_store;
mod feed_store;
mod file_image_store;
mod image_loader;
mod image_store;
mod local_loader;
mod policy;
mod serial_queue;

pub use codable_store::{decode_snapshot, encode_snapshot, CodableFeedStore};
pub use feed_store::{
    CachedFeed, DeletionCompletion, DeletionResult, FeedStore, InsertionCompletion,
    InsertionResult, LocalFeedImage, RetrievalCompletion, RetrievalResult,
};
pub use file_image_store::FileFeedImageDataStore;
pub use image_loader::{
    LoadImageDataResult, LoadImageDataTask, LocalFeedImageLoader, SaveImageDataResult,
};
pub use image_store::{FeedImageDataStore, ImageInsertionCompletion, ImageRetrievalCompletion};
pub use local_loader::{CurrentDate, LocalFeedLoader};
pub use policy::FeedCachePolicy;
pub use serial_queue::SerialQueue;
