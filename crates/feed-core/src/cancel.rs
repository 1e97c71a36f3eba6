//! Cancellable completions for in-flight loads.
//!
//! A `CancellableCompletion` owns a callback that fires at most once. Either
//! the operation delivers its result through [`CancellableCompletion::complete`],
//! or a caller cancels first and the callback is dropped unseen. Whichever
//! happens first wins; everything after is a no-op.

use std::sync::{Arc, Mutex};

type Callback<T> = Box<dyn FnOnce(T) + Send>;

/// A shared, once-only completion slot.
///
/// Clones refer to the same slot, so the operation can hold one clone to
/// deliver through while the caller holds another to cancel with.
pub struct CancellableCompletion<T> {
    slot: Arc<Mutex<Option<Callback<T>>>>,
}

impl<T> CancellableCompletion<T> {
    pub fn new(callback: impl FnOnce(T) + Send + 'static) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(Box::new(callback)))),
        }
    }

    /// Deliver `value` unless the completion was cancelled or already fired.
    ///
    /// Returns `true` if the callback ran. The callback runs outside the lock.
    pub fn complete(&self, value: T) -> bool {
        match self.take() {
            Some(callback) => {
                callback(value);
                true
            }
            None => false,
        }
    }

    /// Drop the pending callback. Safe to call repeatedly or after completion.
    pub fn cancel(&self) {
        // Dropped outside the lock.
        let _ = self.take();
    }

    /// True once the callback has fired or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_none()).unwrap_or(true)
    }

    fn take(&self) -> Option<Callback<T>> {
        match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl<T> Clone for CancellableCompletion<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> std::fmt::Debug for CancellableCompletion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellableCompletion")
            .field("finished", &self.is_finished())
            .finish()
    }
}
