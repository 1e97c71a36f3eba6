//! Image data cache-aside over a [`FeedImageDataStore`].

use super::image_store::FeedImageDataStore;
use crate::cancel::CancellableCompletion;
use crate::error::{ImageLoadError, ImageSaveError};
use crate::feed::{
    FeedImageDataCache, FeedImageDataLoader, FeedImageDataLoaderTask, LoadImageDataCompletion,
    SaveImageDataCompletion,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub type LoadImageDataResult = std::result::Result<Bytes, ImageLoadError>;
pub type SaveImageDataResult = std::result::Result<(), ImageSaveError>;

/// Handle for a pending [`LocalFeedImageLoader::load`].
///
/// Cancelling suppresses the completion even if the store has already
/// produced its result.
#[derive(Debug, Clone)]
pub struct LoadImageDataTask {
    completion: CancellableCompletion<LoadImageDataResult>,
}

impl LoadImageDataTask {
    pub fn cancel(&self) {
        self.completion.cancel();
    }
}

impl FeedImageDataLoaderTask for LoadImageDataTask {
    fn cancel(&self) {
        LoadImageDataTask::cancel(self);
    }
}

/// Loads and saves image bytes through the image data store.
///
/// Like `LocalFeedLoader`, operations hold only a weak reference to the
/// loader while the store works; dropping the loader silences them.
pub struct LocalFeedImageLoader {
    store: Arc<dyn FeedImageDataStore>,
}

impl LocalFeedImageLoader {
    pub fn new(store: Arc<dyn FeedImageDataStore>) -> Self {
        Self { store }
    }

    /// Look up the bytes cached for `url`.
    ///
    /// A stored zero-length payload is a success. Nothing stored is
    /// [`ImageLoadError::NotFound`]; a store failure is [`ImageLoadError::Failed`].
    pub fn load(
        self: &Arc<Self>,
        url: &Url,
        completion: impl FnOnce(LoadImageDataResult) + Send + 'static,
    ) -> LoadImageDataTask {
        let task = LoadImageDataTask {
            completion: CancellableCompletion::new(completion),
        };
        let deliver = task.completion.clone();
        let weak = Arc::downgrade(self);
        let key = url.clone();

        self.store.retrieve(
            url,
            Box::new(move |retrieval| {
                if weak.strong_count() == 0 {
                    return;
                }
                let result = match retrieval {
                    Ok(Some(data)) => Ok(data),
                    Ok(None) => Err(ImageLoadError::NotFound),
                    Err(e) => Err(ImageLoadError::Failed(e)),
                };
                if !deliver.complete(result) {
                    debug!("Image data load for {} was cancelled", key);
                }
            }),
        );

        task
    }

    /// Store `data` for `url`, replacing anything cached before.
    pub fn save(
        self: &Arc<Self>,
        data: Bytes,
        url: &Url,
        completion: impl FnOnce(SaveImageDataResult) + Send + 'static,
    ) {
        let weak = Arc::downgrade(self);
        self.store.insert(
            data,
            url,
            Box::new(move |insertion| {
                if weak.strong_count() == 0 {
                    return;
                }
                completion(insertion.map_err(ImageSaveError::Failed));
            }),
        );
    }
}

impl FeedImageDataLoader for Arc<LocalFeedImageLoader> {
    fn load_image_data(
        &self,
        url: &Url,
        completion: LoadImageDataCompletion,
    ) -> Box<dyn FeedImageDataLoaderTask> {
        Box::new(LocalFeedImageLoader::load(self, url, completion))
    }
}

impl FeedImageDataCache for Arc<LocalFeedImageLoader> {
    fn save_image_data(&self, data: Bytes, url: &Url, completion: SaveImageDataCompletion) {
        LocalFeedImageLoader::save(self, data, url, completion);
    }
}
