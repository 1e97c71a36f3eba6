//! Bridges callback-based operations into async code.
//!
//! ```rust,ignore
//! let feed = wait_for_result(|done| loader.load(done)).await?;
//! ```

use crate::error::{FeedCacheError, Result};
use tokio::sync::oneshot;

/// Completion handed to the operation started by [`wait_for`].
pub type Completion<T> = Box<dyn FnOnce(T) + Send>;

/// Start a callback-based operation and await its single completion.
///
/// Fails with [`FeedCacheError::CompletionDropped`] if the operation drops
/// the callback without invoking it, e.g. because its owner was discarded.
pub async fn wait_for<T, F>(start: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(Completion<T>),
{
    let (tx, rx) = oneshot::channel();
    start(Box::new(move |value| {
        // The receiver may have stopped waiting; nothing to report then.
        let _ = tx.send(value);
    }));
    rx.await.map_err(|_| FeedCacheError::CompletionDropped)
}

/// [`wait_for`] for operations whose completion is itself a `Result`.
pub async fn wait_for_result<T, F>(start: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(Completion<Result<T>>),
{
    wait_for(start).await?
}
