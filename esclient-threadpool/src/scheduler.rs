//! Delayed and fixed-delay tasks

use crate::executor::{Executor, Task};
use esclient_common::TimeValue;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{trace, warn};

/// A command run again and again
pub type RepeatingTask = Arc<dyn Fn() + Send + Sync + 'static>;

/// Handle to a delayed or repeating task
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    token: CancellationToken,
}

impl ScheduledTask {
    /// Stop the task; a run already in progress completes
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Delayed and fixed-delay execution on the pool's runtime
#[derive(Debug, Clone)]
pub struct Scheduler {
    handle: Handle,
    tracker: TaskTracker,
    cancel: CancellationToken,
    periodic: CancellationToken,
}

impl Scheduler {
    pub(crate) fn new(handle: Handle, cancel: CancellationToken) -> Self {
        let periodic = cancel.child_token();
        Self {
            handle,
            tracker: TaskTracker::new(),
            cancel,
            periodic,
        }
    }

    /// Run `command` after `delay`
    pub fn schedule<F>(&self, delay: TimeValue, command: F) -> ScheduledTask
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_on(delay, None, Box::new(command))
    }

    /// After `delay`, hand `command` to `executor`, or run it on a blocking thread
    pub(crate) fn schedule_on(
        &self,
        delay: TimeValue,
        executor: Option<Executor>,
        command: Task,
    ) -> ScheduledTask {
        let token = self.cancel.child_token();
        let task_token = token.clone();
        self.tracker.spawn_on(
            async move {
                tokio::select! {
                    _ = task_token.cancelled() => return,
                    _ = tokio::time::sleep(delay.as_duration()) => {}
                }
                match executor {
                    Some(executor) => {
                        if let Err(error) = executor.submit_accepted(command) {
                            warn!(%error, "scheduled task could not be submitted");
                        }
                    }
                    None => {
                        if let Err(error) = tokio::task::spawn_blocking(command).await {
                            warn!(%error, "scheduled task failed");
                        }
                    }
                }
            },
            &self.handle,
        );
        ScheduledTask { token }
    }

    /// Run `command` repeatedly, waiting `interval` before each run
    ///
    /// The next wait starts when the previous run ends, so runs never overlap.
    pub fn schedule_with_fixed_delay(
        &self,
        interval: TimeValue,
        command: RepeatingTask,
    ) -> ScheduledTask {
        let token = self.periodic.child_token();
        let task_token = token.clone();
        self.tracker.spawn_on(
            async move {
                loop {
                    tokio::select! {
                        _ = task_token.cancelled() => break,
                        _ = tokio::time::sleep(interval.as_duration()) => {}
                    }
                    let run = Arc::clone(&command);
                    trace!("running fixed-delay task");
                    if let Err(error) = tokio::task::spawn_blocking(move || run()).await {
                        warn!(%error, "fixed-delay task failed");
                    }
                }
            },
            &self.handle,
        );
        ScheduledTask { token }
    }

    /// Stop repeating tasks and accept no more; delayed tasks still fire
    pub(crate) fn close(&self) {
        self.periodic.cancel();
        self.tracker.close();
    }

    pub fn is_closed(&self) -> bool {
        self.tracker.is_closed()
    }

    pub(crate) async fn wait(&self) {
        self.tracker.wait().await;
    }
}
