//! Single-worker FIFO execution for store operations.
//!
//! Every job submitted to a `SerialQueue` runs on one dedicated thread, one at
//! a time, in submission order. Stores use this to get mutual exclusion and
//! ordering from the same mechanism.

use crate::error::{FeedCacheError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, error};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A strictly serial job queue backed by one worker thread.
///
/// Dropping the queue closes the channel. Jobs already queued still run,
/// then the worker exits on its own. The worker is never joined: a job may
/// drop the last owner of the queue while running on the worker itself.
pub struct SerialQueue {
    sender: mpsc::Sender<Job>,
    name: String,
}

impl SerialQueue {
    /// Start a new worker thread with the given name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (sender, receiver) = mpsc::channel::<Job>();

        let worker_name = name.clone();
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!("Job panicked on serial queue {}", worker_name);
                    }
                }
                debug!("Serial queue {} drained, worker exiting", worker_name);
            })
            .map_err(|e| {
                error!("Failed to start serial queue {}: {}", name, e);
                FeedCacheError::StoreUnavailable
            })?;

        Ok(Self { sender, name })
    }

    /// Enqueue a job behind everything submitted before it.
    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        if let Err(mpsc::SendError(job)) = self.sender.send(Box::new(job)) {
            // Only reachable if the worker thread died outside a job.
            error!("Serial queue {} is gone, running job inline", self.name);
            job();
        }
    }
}

impl std::fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueue").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_jobs_run_in_submission_order() {
        let queue = SerialQueue::new("test-order").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = mpsc::channel();

        for i in 0..100 {
            let seen = Arc::clone(&seen);
            queue.dispatch(move || {
                // Stagger early jobs so a non-serial executor would reorder them.
                if i % 10 == 0 {
                    thread::sleep(Duration::from_millis(1));
                }
                seen.lock().unwrap().push(i);
            });
        }
        queue.dispatch(move || done_tx.send(()).unwrap());

        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(*seen.lock().unwrap(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_jobs_never_overlap() {
        let queue = SerialQueue::new("test-exclusive").unwrap();
        let active = Arc::new(Mutex::new(0u32));
        let max_seen = Arc::new(Mutex::new(0u32));
        let (done_tx, done_rx) = mpsc::channel();

        for _ in 0..20 {
            let active = Arc::clone(&active);
            let max_seen = Arc::clone(&max_seen);
            queue.dispatch(move || {
                let now = {
                    let mut a = active.lock().unwrap();
                    *a += 1;
                    *a
                };
                {
                    let mut m = max_seen.lock().unwrap();
                    *m = (*m).max(now);
                }
                thread::sleep(Duration::from_millis(1));
                *active.lock().unwrap() -= 1;
            });
        }
        queue.dispatch(move || done_tx.send(()).unwrap());

        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(*max_seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_panicking_job_does_not_stop_worker() {
        let queue = SerialQueue::new("test-panic").unwrap();
        let (tx, rx) = mpsc::channel();

        queue.dispatch(|| panic!("job failure"));
        queue.dispatch(move || tx.send("still running").unwrap());

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "still running");
    }

    #[test]
    fn test_queued_jobs_run_after_drop() {
        let queue = SerialQueue::new("test-drop").unwrap();
        let (tx, rx) = mpsc::channel();

        queue.dispatch(|| thread::sleep(Duration::from_millis(20)));
        queue.dispatch(move || tx.send(()).unwrap());
        drop(queue);

        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }
}
