//! The thread pool interface and its tokio implementation

use crate::executor::Executor;
use crate::info::{ExecutorStats, ThreadPoolInfo, ThreadPoolStats};
use crate::scheduler::{RepeatingTask, ScheduledTask, Scheduler};
use esclient_common::{EsClientError, Result, TimeValue};
use esclient_config::{ClientSettings, ExecutorSettings, GENERIC_EXECUTOR};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::runtime::{Builder, Runtime};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Named executors plus a shared scheduler
pub trait ThreadPool: Send + Sync {
    fn info(&self) -> ThreadPoolInfo;

    fn stats(&self) -> ThreadPoolStats;

    /// The executor every pool has
    fn generic(&self) -> Executor;

    /// The executor registered as `name`
    fn executor(&self, name: &str) -> Result<Executor>;

    fn scheduler(&self) -> Scheduler;

    /// Run `command` every `interval`, measured from the end of the previous run
    fn schedule_with_fixed_delay(
        &self,
        interval: TimeValue,
        command: RepeatingTask,
    ) -> Result<ScheduledTask>;

    /// Run `command` on executor `name` once `delay` has passed
    fn schedule(
        &self,
        delay: TimeValue,
        name: &str,
        command: Box<dyn FnOnce() + Send + 'static>,
    ) -> Result<ScheduledTask>;

    /// Stop accepting work; accepted and delayed tasks still run
    fn shutdown(&self);

    /// Stop accepting work and drop everything not yet started
    fn shutdown_now(&self);

    /// Block until every task finished after shutdown, or `timeout` passed
    ///
    /// Returns `true` when the pool terminated in time.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async context, since it blocks the
    /// calling thread on the pool's runtime.
    fn await_termination(&self, timeout: TimeValue) -> bool;
}

/// [`ThreadPool`] backed by a dedicated tokio runtime
///
/// Tasks run on the runtime's blocking threads; each executor bounds how many of
/// its tasks run at once.
pub struct TokioThreadPool {
    runtime: Option<Runtime>,
    generic: Executor,
    executors: BTreeMap<String, Executor>,
    scheduler: Scheduler,
    cancel: CancellationToken,
    shut_down: AtomicBool,
}

impl TokioThreadPool {
    /// A pool with the executors configured in `settings`
    ///
    /// A `generic` executor is added when the settings do not define one.
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut executor_settings = settings.thread_pool.clone();
        executor_settings
            .entry(GENERIC_EXECUTOR.to_string())
            .or_insert_with(|| ExecutorSettings::cached(128, TimeValue::from_secs(30)));

        let blocking_threads = executor_settings
            .values()
            .map(|s| s.size.max(1))
            .sum::<usize>()
            .max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .max_blocking_threads(blocking_threads)
            .thread_name("esclient-pool")
            .enable_all()
            .build()?;

        let cancel = CancellationToken::new();
        let handle = runtime.handle().clone();
        let executors = executor_settings
            .into_iter()
            .map(|(name, settings)| {
                let executor =
                    Executor::new(name.clone(), settings, handle.clone(), cancel.child_token());
                (name, executor)
            })
            .collect::<BTreeMap<_, _>>();
        let generic = executors
            .get(GENERIC_EXECUTOR)
            .cloned()
            .ok_or_else(|| EsClientError::UnknownExecutor(GENERIC_EXECUTOR.to_string()))?;
        let scheduler = Scheduler::new(handle, cancel.child_token());

        info!(
            executors = ?executors.keys().collect::<Vec<_>>(),
            blocking_threads,
            "thread pool started"
        );
        Ok(Self {
            runtime: Some(runtime),
            generic,
            executors,
            scheduler,
            cancel,
            shut_down: AtomicBool::new(false),
        })
    }

    fn ensure_running(&self, executor: &str) -> Result<()> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(EsClientError::Rejected {
                executor: executor.to_string(),
                reason: "thread pool is shut down".to_string(),
            });
        }
        Ok(())
    }

    fn close_all(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        for executor in self.executors.values() {
            executor.close();
        }
        self.scheduler.close();
    }

    /// Whether shutdown was requested and every task has finished
    pub fn is_terminated(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
            && self.executors.values().all(Executor::is_terminated)
    }
}

impl ThreadPool for TokioThreadPool {
    fn info(&self) -> ThreadPoolInfo {
        ThreadPoolInfo {
            executors: self.executors.values().map(Executor::info).collect(),
        }
    }

    fn stats(&self) -> ThreadPoolStats {
        ThreadPoolStats {
            executors: self
                .executors
                .values()
                .map(|executor| ExecutorStats {
                    name: executor.name().to_string(),
                    counters: executor.counters(),
                })
                .collect(),
        }
    }

    fn generic(&self) -> Executor {
        self.generic.clone()
    }

    fn executor(&self, name: &str) -> Result<Executor> {
        self.executors
            .get(name)
            .cloned()
            .ok_or_else(|| EsClientError::UnknownExecutor(name.to_string()))
    }

    fn scheduler(&self) -> Scheduler {
        self.scheduler.clone()
    }

    fn schedule_with_fixed_delay(
        &self,
        interval: TimeValue,
        command: RepeatingTask,
    ) -> Result<ScheduledTask> {
        self.ensure_running("scheduler")?;
        debug!(%interval, "scheduling fixed-delay task");
        Ok(self.scheduler.schedule_with_fixed_delay(interval, command))
    }

    fn schedule(
        &self,
        delay: TimeValue,
        name: &str,
        command: Box<dyn FnOnce() + Send + 'static>,
    ) -> Result<ScheduledTask> {
        let executor = self.executor(name)?;
        self.ensure_running(name)?;
        debug!(%delay, executor = name, "scheduling delayed task");
        Ok(self.scheduler.schedule_on(delay, Some(executor), command))
    }

    fn shutdown(&self) {
        info!("shutting down thread pool");
        self.close_all();
    }

    fn shutdown_now(&self) {
        info!("shutting down thread pool now");
        self.close_all();
        self.cancel.cancel();
    }

    fn await_termination(&self, timeout: TimeValue) -> bool {
        let Some(runtime) = self.runtime.as_ref() else {
            return true;
        };
        let executors: Vec<Executor> = self.executors.values().cloned().collect();
        let scheduler = self.scheduler.clone();
        runtime.block_on(async move {
            let all_done = async {
                scheduler.wait().await;
                for executor in &executors {
                    executor.wait().await;
                }
            };
            tokio::time::timeout(timeout.as_duration(), all_done)
                .await
                .is_ok()
        })
    }
}

impl Drop for TokioThreadPool {
    fn drop(&mut self) {
        if !self.shut_down.load(Ordering::SeqCst) {
            self.shutdown_now();
        }
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for TokioThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioThreadPool")
            .field("executors", &self.executors.keys().collect::<Vec<_>>())
            .field("shut_down", &self.shut_down.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
