//! Shared test doubles and fixtures for the feed cache integration tests.
//!
//! The spies record every message they receive and hold on to completions so
//! a test can fire them later, in any order, after the action under test.

#![allow(dead_code)]

use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use feed_core::cache::{
    DeletionCompletion, DeletionResult, ImageInsertionCompletion, ImageRetrievalCompletion,
    InsertionCompletion, InsertionResult, RetrievalCompletion, RetrievalResult,
};
use feed_core::{FeedCacheError, FeedImage, FeedImageDataStore, FeedStore, LocalFeedImage};
use std::sync::{Arc, Mutex};
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum ReceivedMessage {
    DeleteCachedFeed,
    Insert(Vec<LocalFeedImage>, DateTime<Utc>),
    Retrieve,
}

type Slot<C> = Mutex<Vec<Option<C>>>;

fn push<C>(slot: &Slot<C>, completion: C) {
    slot.lock().unwrap().push(Some(completion));
}

fn take<C>(slot: &Slot<C>, index: usize) -> C {
    slot.lock().unwrap()[index]
        .take()
        .expect("completion already fired")
}

/// Feed store that captures completions instead of completing them.
#[derive(Default)]
pub struct FeedStoreSpy {
    messages: Mutex<Vec<ReceivedMessage>>,
    deletions: Slot<DeletionCompletion>,
    insertions: Slot<InsertionCompletion>,
    retrievals: Slot<RetrievalCompletion>,
}

impl FeedStoreSpy {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received_messages(&self) -> Vec<ReceivedMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn complete_deletion(&self, index: usize, result: DeletionResult) {
        take(&self.deletions, index)(result);
    }

    pub fn complete_insertion(&self, index: usize, result: InsertionResult) {
        take(&self.insertions, index)(result);
    }

    pub fn complete_retrieval(&self, index: usize, result: RetrievalResult) {
        take(&self.retrievals, index)(result);
    }
}

impl FeedStore for FeedStoreSpy {
    fn delete_cached_feed(&self, completion: DeletionCompletion) {
        self.messages
            .lock()
            .unwrap()
            .push(ReceivedMessage::DeleteCachedFeed);
        push(&self.deletions, completion);
    }

    fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    ) {
        self.messages
            .lock()
            .unwrap()
            .push(ReceivedMessage::Insert(feed, timestamp));
        push(&self.insertions, completion);
    }

    fn retrieve(&self, completion: RetrievalCompletion) {
        self.messages.lock().unwrap().push(ReceivedMessage::Retrieve);
        push(&self.retrievals, completion);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageMessage {
    Insert(Bytes, Url),
    Retrieve(Url),
}

/// Image data store that captures completions instead of completing them.
#[derive(Default)]
pub struct ImageDataStoreSpy {
    messages: Mutex<Vec<ImageMessage>>,
    insertions: Slot<ImageInsertionCompletion>,
    retrievals: Slot<ImageRetrievalCompletion>,
}

impl ImageDataStoreSpy {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received_messages(&self) -> Vec<ImageMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn complete_insertion(&self, index: usize, result: feed_core::Result<()>) {
        take(&self.insertions, index)(result);
    }

    pub fn complete_retrieval(&self, index: usize, result: feed_core::Result<Option<Bytes>>) {
        take(&self.retrievals, index)(result);
    }
}

impl FeedImageDataStore for ImageDataStoreSpy {
    fn insert(&self, data: Bytes, url: &Url, completion: ImageInsertionCompletion) {
        self.messages
            .lock()
            .unwrap()
            .push(ImageMessage::Insert(data, url.clone()));
        push(&self.insertions, completion);
    }

    fn retrieve(&self, url: &Url, completion: ImageRetrievalCompletion) {
        self.messages
            .lock()
            .unwrap()
            .push(ImageMessage::Retrieve(url.clone()));
        push(&self.retrievals, completion);
    }
}

pub type SaveResult = feed_core::Result<()>;
pub type LoadResult = feed_core::Result<Vec<FeedImage>>;
pub type ValidateResult = feed_core::Result<()>;

/// Collects every value a completion delivers.
pub struct Captured<T> {
    values: Arc<Mutex<Vec<T>>>,
}

impl<T: Send + 'static> Captured<T> {
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn completion(&self) -> Box<dyn FnOnce(T) + Send> {
        let values = Arc::clone(&self.values);
        Box::new(move |value| values.lock().unwrap().push(value))
    }

    pub fn count(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    /// Remove and return the single delivered value.
    pub fn single(&self) -> T {
        let mut values = self.values.lock().unwrap();
        assert_eq!(values.len(), 1, "expected exactly one completion");
        values.remove(0)
    }
}

/// A clock the test can move.
#[derive(Clone)]
pub struct TestClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn as_fn(&self) -> impl Fn() -> DateTime<Utc> + Send + Sync + 'static {
        let clock = self.clone();
        move || clock.now()
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap()
}

pub fn max_age() -> Duration {
    Duration::days(7)
}

/// Timestamp whose age at `now` is exactly the freshness window.
pub fn expiration_timestamp(now: DateTime<Utc>) -> DateTime<Utc> {
    now - max_age()
}

pub fn any_url() -> Url {
    Url::parse("https://any-url.com").unwrap()
}

pub fn any_error() -> FeedCacheError {
    FeedCacheError::Other("any error".to_string())
}

pub fn any_data() -> Bytes {
    Bytes::from_static(b"any data")
}

pub fn unique_image() -> FeedImage {
    FeedImage::new(
        Uuid::new_v4(),
        Some("any".to_string()),
        Some("any".to_string()),
        Url::parse(&format!("https://any-url.com/{}", Uuid::new_v4())).unwrap(),
    )
}

/// Two unique images in both representations.
pub fn unique_image_feed() -> (Vec<FeedImage>, Vec<LocalFeedImage>) {
    let models = vec![unique_image(), unique_image()];
    let local = models.iter().map(LocalFeedImage::from).collect();
    (models, local)
}
