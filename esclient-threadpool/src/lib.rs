//! # esclient thread pool
//!
//! Named executors and a scheduler for blocking client work.
//!
//! [`ThreadPool`] is the interface; [`TokioThreadPool`] implements it on a
//! dedicated tokio runtime, with one bounded [`Executor`] per name configured in
//! `thread_pool` of the client settings.
//!
//! ```rust
//! use esclient_common::TimeValue;
//! use esclient_config::ClientSettings;
//! use esclient_threadpool::{ThreadPool, TokioThreadPool};
//! use std::sync::mpsc;
//!
//! let pool = TokioThreadPool::new(&ClientSettings::default()).unwrap();
//! let (tx, rx) = mpsc::channel();
//! pool.generic().execute(move || tx.send(42).unwrap()).unwrap();
//! assert_eq!(rx.recv().unwrap(), 42);
//!
//! pool.shutdown();
//! assert!(pool.await_termination(TimeValue::from_secs(5)));
//! ```

mod executor;
mod info;
mod pool;
mod scheduler;

pub use executor::{Executor, Task};
pub use info::{ExecutorCounters, ExecutorInfo, ExecutorStats, ThreadPoolInfo, ThreadPoolStats};
pub use pool::{ThreadPool, TokioThreadPool};
pub use scheduler::{RepeatingTask, ScheduledTask, Scheduler};
