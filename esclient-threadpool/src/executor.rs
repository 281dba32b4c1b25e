//! Named executors running blocking tasks on the pool runtime

use crate::info::{ExecutorCounters, ExecutorInfo};
use esclient_common::{EsClientError, Result};
use esclient_config::ExecutorSettings;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

/// A unit of blocking work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

struct ExecutorInner {
    name: String,
    settings: ExecutorSettings,
    handle: Handle,
    permits: Arc<Semaphore>,
    /// Running plus queued slots, when the queue is bounded
    capacity: Option<Arc<Semaphore>>,
    tracker: TaskTracker,
    cancel: CancellationToken,
    active: AtomicUsize,
    queued: AtomicUsize,
    completed: AtomicU64,
    rejected: AtomicU64,
}

/// A named, bounded executor
///
/// At most `size` tasks run at once, each on a blocking thread of the pool's
/// runtime. Cheap to clone; clones share the same executor.
#[derive(Clone)]
pub struct Executor {
    inner: Arc<ExecutorInner>,
}

impl Executor {
    pub(crate) fn new(
        name: impl Into<String>,
        settings: ExecutorSettings,
        handle: Handle,
        cancel: CancellationToken,
    ) -> Self {
        let size = settings.size.max(1);
        let permits = Arc::new(Semaphore::new(size));
        let capacity = settings
            .queue_size
            .map(|queue_size| Arc::new(Semaphore::new(size.saturating_add(queue_size))));
        Self {
            inner: Arc::new(ExecutorInner {
                name: name.into(),
                settings,
                handle,
                permits,
                capacity,
                tracker: TaskTracker::new(),
                cancel,
                active: AtomicUsize::new(0),
                queued: AtomicUsize::new(0),
                completed: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Run `task` once a slot is free
    ///
    /// Rejected once the executor is shut down, or when the queue is full.
    pub fn execute<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Box::new(task))
    }

    pub(crate) fn submit(&self, task: Task) -> Result<()> {
        if self.inner.tracker.is_closed() {
            return Err(self.reject("executor is shut down"));
        }
        self.submit_accepted(task)
    }

    /// Submit a task accepted before shutdown, such as a delayed task firing
    pub(crate) fn submit_accepted(&self, task: Task) -> Result<()> {
        let inner = &self.inner;
        if inner.cancel.is_cancelled() {
            return Err(self.reject("executor is shut down"));
        }
        // held until the task finishes or is dropped from the queue
        let slot = match &inner.capacity {
            Some(capacity) => match Arc::clone(capacity).try_acquire_owned() {
                Ok(slot) => Some(slot),
                Err(_) => {
                    let limit = inner.settings.queue_size.unwrap_or_default();
                    return Err(self.reject(&format!("queue capacity [{limit}] reached")));
                }
            },
            None => None,
        };

        inner.queued.fetch_add(1, Ordering::SeqCst);
        let worker = Arc::clone(inner);
        inner.tracker.spawn_on(
            async move {
                let permit = tokio::select! {
                    permit = Arc::clone(&worker.permits).acquire_owned() => permit,
                    _ = worker.cancel.cancelled() => {
                        worker.queued.fetch_sub(1, Ordering::SeqCst);
                        debug!(executor = %worker.name, "dropping queued task");
                        return;
                    }
                };
                worker.queued.fetch_sub(1, Ordering::SeqCst);
                let Ok(permit) = permit else {
                    return;
                };

                worker.active.fetch_add(1, Ordering::SeqCst);
                let outcome = tokio::task::spawn_blocking(task).await;
                worker.active.fetch_sub(1, Ordering::SeqCst);
                drop(permit);
                drop(slot);
                worker.completed.fetch_add(1, Ordering::SeqCst);

                if let Err(error) = outcome {
                    warn!(executor = %worker.name, %error, "task failed");
                }
            },
            &inner.handle,
        );
        Ok(())
    }

    fn reject(&self, reason: &str) -> EsClientError {
        self.inner.rejected.fetch_add(1, Ordering::SeqCst);
        debug!(executor = %self.inner.name, reason, "rejecting task");
        EsClientError::Rejected {
            executor: self.inner.name.clone(),
            reason: reason.to_string(),
        }
    }

    /// Stop accepting tasks; accepted tasks still run
    pub(crate) fn close(&self) {
        self.inner.tracker.close();
    }

    /// Resolves once the executor is closed and every accepted task has finished
    pub(crate) async fn wait(&self) {
        self.inner.tracker.wait().await;
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.inner.tracker.is_closed() && self.inner.tracker.is_empty()
    }

    pub fn info(&self) -> ExecutorInfo {
        let settings = &self.inner.settings;
        ExecutorInfo {
            name: self.inner.name.clone(),
            kind: settings.kind,
            size: settings.size,
            queue_size: settings.queue_size,
            keep_alive: settings.keep_alive,
        }
    }

    pub fn counters(&self) -> ExecutorCounters {
        ExecutorCounters {
            active: self.inner.active.load(Ordering::SeqCst),
            queue: self.inner.queued.load(Ordering::SeqCst),
            completed: self.inner.completed.load(Ordering::SeqCst),
            rejected: self.inner.rejected.load(Ordering::SeqCst),
        }
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("name", &self.inner.name)
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}
