//! Concurrent dispatch of per-photo work.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::Result;

/// Outcome of a full dispatch round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub succeeded: u64,
    pub failed: u64,
}

/// Runs submitted tasks on the tokio worker pool.
///
/// Submission never waits; when a concurrency bound is set, tasks wait for a
/// permit inside their own future. `join` is the barrier that must be awaited
/// before the run is considered complete.
pub struct Dispatcher {
    tasks: JoinSet<Result<()>>,
    limit: Option<Arc<Semaphore>>,
    submitted: u64,
}

impl Dispatcher {
    /// Create a dispatcher. `concurrency == 0` means unbounded.
    ///
    /// Bounds above `Semaphore::MAX_PERMITS` are clamped.
    pub fn new(concurrency: usize) -> Self {
        let limit = (concurrency > 0)
            .then(|| Arc::new(Semaphore::new(concurrency.min(Semaphore::MAX_PERMITS))));
        Self {
            tasks: JoinSet::new(),
            limit,
            submitted: 0,
        }
    }

    /// Submit one unit of work.
    pub fn submit<F>(&mut self, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.submitted += 1;
        match self.limit.clone() {
            Some(limit) => {
                self.tasks.spawn(async move {
                    // Held until the task finishes; the semaphore is never closed.
                    let _permit = limit.acquire_owned().await;
                    task.await
                });
            }
            None => {
                self.tasks.spawn(task);
            }
        }
    }

    /// Tasks submitted so far.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Tasks not yet joined.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every submitted task to finish.
    ///
    /// A task that returns an error or panics counts as failed.
    pub async fn join(mut self) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Ok(())) => summary.succeeded += 1,
                Ok(Err(_)) => summary.failed += 1,
                Err(e) => {
                    tracing::error!("Download task aborted: {}", e);
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_join_waits_for_all_tasks() {
        let done = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(0);

        for i in 0..10u64 {
            let done = Arc::clone(&done);
            dispatcher.submit(async move {
                tokio::time::sleep(Duration::from_millis(10 * (i % 3))).await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok::<(), Error>(())
            });
        }

        assert_eq!(dispatcher.submitted(), 10);
        let summary = dispatcher.join().await;
        assert_eq!(done.load(Ordering::SeqCst), 10);
        assert_eq!(
            summary,
            DispatchSummary {
                succeeded: 10,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let mut dispatcher = Dispatcher::new(2);

        dispatcher.submit(async {
            Err::<(), Error>(Error::Fetch {
                photo_id: "1".into(),
                reason: "HTTP 500".into(),
            })
        });
        dispatcher.submit(async {
            let missing: Option<()> = None;
            missing.expect("worker blew up");
            Ok::<(), Error>(())
        });
        for _ in 0..3 {
            dispatcher.submit(async { Ok::<(), Error>(()) });
        }

        let summary = dispatcher.join().await;
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 2);
    }

    #[tokio::test]
    async fn test_oversized_bound_is_clamped() {
        let mut dispatcher = Dispatcher::new(usize::MAX);
        dispatcher.submit(async { Ok::<(), Error>(()) });

        let summary = dispatcher.join().await;
        assert_eq!(summary.succeeded, 1);
    }

    #[tokio::test]
    async fn test_concurrency_bound() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(3);

        for _ in 0..12 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            dispatcher.submit(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok::<(), Error>(())
            });
        }

        let summary = dispatcher.join().await;
        assert_eq!(summary.succeeded, 12);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }
}
