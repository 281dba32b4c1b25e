//! Executors, scheduling and shutdown of the tokio-backed pool

use esclient_common::{EsClientError, TimeValue};
use esclient_config::{ClientSettings, ExecutorSettings, GENERIC_EXECUTOR};
use esclient_threadpool::{ThreadPool, TokioThreadPool};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn pool_with(executors: &[(&str, ExecutorSettings)]) -> TokioThreadPool {
    let thread_pool: BTreeMap<String, ExecutorSettings> = executors
        .iter()
        .map(|(name, settings)| (name.to_string(), settings.clone()))
        .collect();
    let settings = ClientSettings {
        thread_pool,
        ..ClientSettings::default()
    };
    TokioThreadPool::new(&settings).unwrap()
}

#[test_log::test]
fn test_tasks_run_and_are_counted() {
    let pool = pool_with(&[("search", ExecutorSettings::fixed(2))]);
    let executor = pool.executor("search").unwrap();
    let (tx, rx) = mpsc::channel();

    for i in 0..5 {
        let tx = tx.clone();
        executor.execute(move || tx.send(i).unwrap()).unwrap();
    }

    let mut seen: Vec<i32> = (0..5).map(|_| rx.recv_timeout(WAIT).unwrap()).collect();
    seen.sort();
    assert_eq!(seen, [0, 1, 2, 3, 4]);

    pool.shutdown();
    assert!(pool.await_termination(TimeValue::from_secs(5)));
    let stats = pool.stats();
    assert_eq!(stats.executor("search").unwrap().completed, 5);
    assert_eq!(stats.executor("search").unwrap().active, 0);
}

#[test]
fn test_fixed_executor_bounds_concurrency() {
    let pool = pool_with(&[("single", ExecutorSettings::fixed(1))]);
    let executor = pool.executor("single").unwrap();
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    for _ in 0..4 {
        let running = Arc::clone(&running);
        let peak = Arc::clone(&peak);
        executor
            .execute(move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(20));
                running.fetch_sub(1, Ordering::SeqCst);
            })
            .unwrap();
    }

    pool.shutdown();
    assert!(pool.await_termination(TimeValue::from_secs(5)));
    assert_eq!(peak.load(Ordering::SeqCst), 1);
}

#[test]
fn test_submissions_after_shutdown_are_rejected() {
    let pool = pool_with(&[]);
    let generic = pool.generic();
    pool.shutdown();

    let error = generic.execute(|| {}).unwrap_err();
    assert!(matches!(error, EsClientError::Rejected { executor, .. } if executor == GENERIC_EXECUTOR));
    assert_eq!(pool.stats().executor(GENERIC_EXECUTOR).unwrap().rejected, 1);

    assert!(pool
        .schedule(TimeValue::from_millis(1), GENERIC_EXECUTOR, Box::new(|| {}))
        .is_err());
    assert!(pool
        .schedule_with_fixed_delay(TimeValue::from_millis(1), Arc::new(|| {}))
        .is_err());
}

#[test]
fn test_full_queue_rejects() {
    let pool = pool_with(&[("bounded", ExecutorSettings::fixed(1).with_queue_size(1))]);
    let executor = pool.executor("bounded").unwrap();
    let gate = Arc::new(Barrier::new(2));

    let blocker = Arc::clone(&gate);
    executor.execute(move || {
        blocker.wait();
    })
    .unwrap();
    // wait until the first task holds the only slot
    while pool.stats().executor("bounded").unwrap().active == 0 {
        std::thread::sleep(Duration::from_millis(5));
    }

    executor.execute(|| {}).unwrap();
    let error = executor.execute(|| {}).unwrap_err();
    assert!(error.to_string().contains("queue capacity"));

    gate.wait();
    pool.shutdown();
    assert!(pool.await_termination(TimeValue::from_secs(5)));
}

#[test]
fn test_burst_beyond_queue_is_rejected() {
    let pool = pool_with(&[("bounded", ExecutorSettings::fixed(1).with_queue_size(1))]);
    let executor = pool.executor("bounded").unwrap();
    let gate = Arc::new(Barrier::new(2));

    let blocker = Arc::clone(&gate);
    let mut accepted = usize::from(
        executor
            .execute(move || {
                blocker.wait();
            })
            .is_ok(),
    );
    for _ in 0..19 {
        if executor.execute(|| {}).is_ok() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 2);
    assert_eq!(pool.stats().executor("bounded").unwrap().rejected, 18);

    gate.wait();
    pool.shutdown();
    assert!(pool.await_termination(TimeValue::from_secs(5)));
}

#[test]
fn test_queue_slots_are_released_after_tasks_finish() {
    let pool = pool_with(&[("bounded", ExecutorSettings::fixed(1).with_queue_size(1))]);
    let executor = pool.executor("bounded").unwrap();

    for round in 1..=5u64 {
        executor.execute(|| {}).unwrap();
        executor.execute(|| {}).unwrap();
        // slots are returned before a task counts as completed
        while pool.stats().executor("bounded").unwrap().completed < round * 2 {
            std::thread::sleep(Duration::from_millis(5));
        }
    }
    assert_eq!(pool.stats().executor("bounded").unwrap().rejected, 0);

    pool.shutdown();
    assert!(pool.await_termination(TimeValue::from_secs(5)));
}

#[test]
fn test_schedule_runs_on_named_executor_after_delay() {
    let pool = pool_with(&[("management", ExecutorSettings::fixed(1))]);
    let (tx, rx) = mpsc::channel();
    let started = std::time::Instant::now();

    pool.schedule(
        TimeValue::from_millis(50),
        "management",
        Box::new(move || tx.send(std::thread::current().name().map(String::from)).unwrap()),
    )
    .unwrap();

    let thread_name = rx.recv_timeout(WAIT).unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(thread_name.as_deref(), Some("esclient-pool"));
}

#[test]
fn test_schedule_on_unknown_executor_fails() {
    let pool = pool_with(&[]);
    let error = pool
        .schedule(TimeValue::from_millis(1), "missing", Box::new(|| {}))
        .unwrap_err();
    assert!(matches!(error, EsClientError::UnknownExecutor(_)));
}

#[test]
fn test_cancelled_schedule_never_runs() {
    let pool = pool_with(&[]);
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);

    let task = pool
        .schedule(
            TimeValue::from_millis(100),
            GENERIC_EXECUTOR,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
    task.cancel();
    assert!(task.is_cancelled());

    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn test_fixed_delay_repeats_until_cancelled() {
    let pool = pool_with(&[]);
    let (tx, rx) = mpsc::channel();

    let task = pool
        .schedule_with_fixed_delay(
            TimeValue::from_millis(10),
            Arc::new(move || {
                let _ = tx.send(());
            }),
        )
        .unwrap();

    for _ in 0..3 {
        rx.recv_timeout(WAIT).unwrap();
    }
    task.cancel();

    pool.shutdown();
    assert!(pool.await_termination(TimeValue::from_secs(5)));
}

#[test]
fn test_shutdown_stops_fixed_delay_tasks() {
    let pool = pool_with(&[]);
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);

    pool.schedule_with_fixed_delay(
        TimeValue::from_millis(10),
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    )
    .unwrap();
    std::thread::sleep(Duration::from_millis(50));

    pool.shutdown();
    assert!(pool.await_termination(TimeValue::from_secs(5)));
    let after_shutdown = runs.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(runs.load(Ordering::SeqCst), after_shutdown);
}

#[test]
fn test_shutdown_now_drops_queued_tasks() {
    let pool = pool_with(&[("single", ExecutorSettings::fixed(1))]);
    let executor = pool.executor("single").unwrap();
    let gate = Arc::new(Barrier::new(2));
    let ran = Arc::new(AtomicUsize::new(0));

    let blocker = Arc::clone(&gate);
    executor.execute(move || {
        blocker.wait();
    })
    .unwrap();
    while pool.stats().executor("single").unwrap().active == 0 {
        std::thread::sleep(Duration::from_millis(5));
    }
    for _ in 0..3 {
        let ran = Arc::clone(&ran);
        executor
            .execute(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    }

    pool.shutdown_now();
    gate.wait();
    assert!(pool.await_termination(TimeValue::from_secs(5)));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn test_await_termination_times_out_while_busy() {
    let pool = pool_with(&[]);
    let gate = Arc::new(Barrier::new(2));
    let blocker = Arc::clone(&gate);
    pool.generic()
        .execute(move || {
            blocker.wait();
        })
        .unwrap();

    pool.shutdown();
    assert!(!pool.await_termination(TimeValue::from_millis(50)));
    gate.wait();
    assert!(pool.await_termination(TimeValue::from_secs(5)));
}

#[test]
fn test_info_reports_settings() {
    let pool = pool_with(&[("search", ExecutorSettings::fixed(3).with_queue_size(100))]);
    let info = pool.info();
    let search = info.executor("search").unwrap();
    assert_eq!(search.size, 3);
    assert_eq!(search.queue_size, Some(100));

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["executors"][1]["type"], "fixed");
}
