//! Error types for the feed cache.
//!
//! Every store failure is recovered into a `FeedCacheError` before it reaches
//! the cache policy. The image cache-aside has its own small taxonomy so callers
//! can tell "no image" apart from "load error".

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the feed cache.
#[derive(Debug, Error)]
pub enum FeedCacheError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Snapshot format errors
    #[error("Failed to decode cache snapshot: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Failed to encode cache snapshot: {message}")]
    Encode {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Unsupported snapshot version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    // Execution errors
    #[error("Store worker is unavailable")]
    StoreUnavailable,

    #[error("Operation finished without delivering a result")]
    CompletionDropped,

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for feed cache operations.
pub type Result<T> = std::result::Result<T, FeedCacheError>;

impl From<std::io::Error> for FeedCacheError {
    fn from(err: std::io::Error) -> Self {
        FeedCacheError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for FeedCacheError {
    fn from(err: serde_json::Error) -> Self {
        FeedCacheError::Decode {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl FeedCacheError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        FeedCacheError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// True when the persisted bytes did not match the snapshot shape.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            FeedCacheError::Decode { .. } | FeedCacheError::UnsupportedVersion { .. }
        )
    }

    /// True for OS-level read, write or remove failures.
    pub fn is_io_error(&self) -> bool {
        matches!(self, FeedCacheError::Io { .. })
    }
}

/// Errors delivered by `LocalFeedImageLoader::load`.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to load image data")]
    Failed(#[source] FeedCacheError),

    #[error("No image data cached for this URL")]
    NotFound,
}

/// Errors delivered by `LocalFeedImageLoader::save`.
#[derive(Debug, Error)]
pub enum ImageSaveError {
    #[error("Failed to save image data")]
    Failed(#[source] FeedCacheError),
}
