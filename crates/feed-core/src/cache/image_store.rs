//! Image data store contract.

use crate::error::Result;
use bytes::Bytes;
use url::Url;

pub type ImageInsertionCompletion = Box<dyn FnOnce(Result<()>) + Send>;
/// `Ok(None)` means nothing is stored for the URL; `Ok(Some(empty))` is a stored empty payload.
pub type ImageRetrievalCompletion = Box<dyn FnOnce(Result<Option<Bytes>>) + Send>;

/// Key-value persistence for image bytes, one entry per URL, last write wins.
pub trait FeedImageDataStore: Send + Sync {
    fn insert(&self, data: Bytes, url: &Url, completion: ImageInsertionCompletion);

    fn retrieve(&self, url: &Url, completion: ImageRetrievalCompletion);
}
