//! Deadline-bounded tasks and the worker pool for blocking bodies.
//!
//! Both dispatch strategies produce a [`BoundedTask`]: a boxed future plus the
//! cancellation token that is tripped when the deadline passes or the caller
//! gives up.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use wcommon::BoxFuture;

use crate::{ToolError, ToolResult};

#[derive(Debug)]
pub enum Settled {
    Completed(ToolResult),
    TimedOut,
    Cancelled,
}

pub struct BoundedTask {
    future: BoxFuture<'static, ToolResult>,
    cancel: CancellationToken,
}

impl BoundedTask {
    /// Wraps a future, converting panics raised while polling it into
    /// execution errors.
    pub fn awaiting<F>(future: F, cancel: CancellationToken) -> Self
    where
        F: Future<Output = ToolResult> + Send + 'static,
    {
        let future = AssertUnwindSafe(future)
            .catch_unwind()
            .map(|result| result.unwrap_or_else(|payload| Err(panic_error(payload.as_ref()))));

        Self {
            future: Box::pin(future),
            cancel,
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drives the task until it completes, `deadline` elapses or `caller` is
    /// cancelled. In the latter two cases the task token is cancelled and the
    /// future dropped.
    pub async fn settle(self, deadline: Duration, caller: &CancellationToken) -> Settled {
        let Self { future, cancel } = self;

        let settled = tokio::select! {
            biased;
            _ = caller.cancelled() => Settled::Cancelled,
            result = tokio::time::timeout(deadline, future) => match result {
                Ok(result) => Settled::Completed(result),
                Err(_) => Settled::TimedOut,
            },
        };

        if !matches!(settled, Settled::Completed(_)) {
            cancel.cancel();
        }
        settled
    }
}

/// Bounded pool for blocking bodies.
///
/// Each body holds a permit for as long as it runs. A body abandoned after a
/// timeout keeps its permit until it returns, so a body that never returns
/// costs one slot for the lifetime of the pool.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            slots: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn close(&self) {
        self.slots.close();
    }

    pub fn is_closed(&self) -> bool {
        self.slots.is_closed()
    }

    /// Queues `job` behind a free slot. Waiting for the slot happens inside the
    /// returned task, so it counts against the task's deadline.
    pub fn submit<F>(&self, job: F, cancel: CancellationToken) -> BoundedTask
    where
        F: FnOnce() -> ToolResult + Send + 'static,
    {
        let slots = Arc::clone(&self.slots);
        let future = async move {
            let permit = slots.acquire_owned().await.map_err(|_| {
                ToolError::execution("worker pool is shut down").with_error_type("PoolClosed")
            })?;

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                job()
            });

            match handle.await {
                Ok(result) => result,
                Err(error) if error.is_panic() => Err(panic_error(error.into_panic().as_ref())),
                Err(error) => Err(ToolError::execution(format!("worker task failed: {error}"))),
            }
        };

        BoundedTask {
            future: Box::pin(future),
            cancel,
        }
    }
}

fn panic_error(payload: &(dyn Any + Send)) -> ToolError {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    ToolError::panicked(message)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{ToolErrorKind, ToolOutput};

    #[tokio::test]
    async fn awaited_task_completes_within_deadline() {
        let task = BoundedTask::awaiting(async { Ok(ToolOutput::from("done")) }, CancellationToken::new());

        let settled = task
            .settle(Duration::from_secs(1), &CancellationToken::new())
            .await;
        assert!(matches!(settled, Settled::Completed(Ok(ToolOutput::Value(_)))));
    }

    #[tokio::test]
    async fn awaited_task_times_out_and_trips_its_token() {
        let cancel = CancellationToken::new();
        let task = BoundedTask::awaiting(
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(ToolOutput::from("late"))
            },
            cancel.clone(),
        );

        let settled = task
            .settle(Duration::from_millis(20), &CancellationToken::new())
            .await;
        assert!(matches!(settled, Settled::TimedOut));
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn caller_cancellation_wins_over_pending_work() {
        let caller = CancellationToken::new();
        caller.cancel();
        let task = BoundedTask::awaiting(std::future::pending(), caller.child_token());

        let settled = task.settle(Duration::from_secs(5), &caller).await;
        assert!(matches!(settled, Settled::Cancelled));
    }

    #[tokio::test]
    async fn panics_in_awaited_bodies_become_errors() {
        async fn explode() -> ToolResult {
            panic!("kaboom")
        }
        let task = BoundedTask::awaiting(explode(), CancellationToken::new());

        let Settled::Completed(Err(error)) = task
            .settle(Duration::from_secs(1), &CancellationToken::new())
            .await
        else {
            panic!("expected a contained panic");
        };
        assert_eq!(error.kind, ToolErrorKind::Execution);
        assert_eq!(error.error_type.as_deref(), Some("panic"));
        assert_eq!(error.message, "kaboom");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn pool_runs_jobs_and_contains_panics() {
        let pool = WorkerPool::new(2);

        let ok = pool
            .submit(|| Ok(ToolOutput::from("ran")), CancellationToken::new())
            .settle(Duration::from_secs(1), &CancellationToken::new())
            .await;
        assert!(matches!(ok, Settled::Completed(Ok(_))));

        let panicked = pool
            .submit(|| panic!("worker blew up"), CancellationToken::new())
            .settle(Duration::from_secs(1), &CancellationToken::new())
            .await;
        let Settled::Completed(Err(error)) = panicked else {
            panic!("expected a contained panic");
        };
        assert_eq!(error.message, "worker blew up");
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn abandoned_job_releases_slot_when_it_finishes() {
        let pool = WorkerPool::new(1);

        let settled = pool
            .submit(
                || {
                    thread::sleep(Duration::from_millis(150));
                    Ok(ToolOutput::from("late"))
                },
                CancellationToken::new(),
            )
            .settle(Duration::from_millis(20), &CancellationToken::new())
            .await;
        assert!(matches!(settled, Settled::TimedOut));
        assert_eq!(pool.available(), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn closed_pool_rejects_new_jobs() {
        let pool = WorkerPool::new(1);
        pool.close();
        assert!(pool.is_closed());

        let settled = pool
            .submit(|| Ok(ToolOutput::from("never")), CancellationToken::new())
            .settle(Duration::from_secs(1), &CancellationToken::new())
            .await;
        let Settled::Completed(Err(error)) = settled else {
            panic!("expected pool closed error");
        };
        assert_eq!(error.error_type.as_deref(), Some("PoolClosed"));
    }

    #[test]
    fn pool_size_is_at_least_one() {
        assert_eq!(WorkerPool::new(0).size(), 1);
        assert_eq!(WorkerPool::new(3).available(), 3);
    }
}
