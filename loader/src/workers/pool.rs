use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Results gathered from a [`WorkerPool::run`] call.
#[derive(Debug)]
pub struct PoolResults<T> {
    /// Number of jobs handed to the pool.
    pub submitted: usize,
    /// Job results in completion order.
    pub results: Vec<T>,
    /// Jobs whose task panicked or was cancelled and therefore produced no result.
    pub lost: usize,
}

/// Runs independent jobs on the tokio runtime with a bounded number in flight.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    max_workers: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `max_workers` jobs at once (at least one).
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Runs `work` for every job and waits for all of them.
    ///
    /// A new job starts as soon as a running one finishes. Results are collected as jobs
    /// complete, not in submission order.
    pub async fn run<J, T, F, Fut>(&self, jobs: Vec<J>, work: F) -> PoolResults<T>
    where
        J: Send + 'static,
        T: Send + 'static,
        F: Fn(J) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let submitted = jobs.len();
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let work = Arc::new(work);

        let mut join_set = JoinSet::new();
        let mut lost = 0;

        for job in jobs {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => {
                    error!(error = %err, "worker pool semaphore closed, job dropped");
                    lost += 1;
                    continue;
                }
            };

            let work = work.clone();
            join_set.spawn(async move {
                let _permit = permit;
                work(job).await
            });
        }

        debug!(submitted, max_workers = self.max_workers, "all jobs spawned");

        let mut results = Vec::with_capacity(submitted);
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(value) => results.push(value),
                Err(join_err) => {
                    lost += 1;
                    if join_err.is_panic() {
                        error!(error = %join_err, "worker panicked");
                    } else {
                        debug!("worker task was cancelled");
                    }
                }
            }
        }

        PoolResults {
            submitted,
            results,
            lost,
        }
    }
}
