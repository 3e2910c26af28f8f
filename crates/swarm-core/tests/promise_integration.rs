//! Integration tests for promise chains

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use swarm_core::{Event, MemorySink, Runtime, RuntimeOptions};

struct Branches {
    then_ran: Arc<AtomicBool>,
    catch_ran: Arc<AtomicBool>,
}

impl Branches {
    fn new() -> Self {
        Self {
            then_ran: Arc::new(AtomicBool::new(false)),
            catch_ran: Arc::new(AtomicBool::new(false)),
        }
    }

    fn run(&self, runtime: &Runtime, body_succeeds: bool) {
        let then_ran = self.then_ran.clone();
        let catch_ran = self.catch_ran.clone();
        runtime
            .promise(
                move |res| res.done(body_succeeds),
                move |res| {
                    then_ran.store(true, Ordering::SeqCst);
                    res.resolve();
                },
                move |res| {
                    catch_ran.store(true, Ordering::SeqCst);
                    res.resolve();
                },
            )
            .unwrap();
    }
}

#[test]
fn test_resolved_body_runs_then() {
    let runtime = Runtime::new();
    let branches = Branches::new();

    branches.run(&runtime, true);
    runtime.wait_all();

    assert!(branches.then_ran.load(Ordering::SeqCst));
    assert!(!branches.catch_ran.load(Ordering::SeqCst));
}

#[test]
fn test_rejected_body_runs_catch() {
    let runtime = Runtime::new();
    let branches = Branches::new();

    branches.run(&runtime, false);
    runtime.wait_all();

    assert!(branches.catch_ran.load(Ordering::SeqCst));
    assert!(!branches.then_ran.load(Ordering::SeqCst));
}

#[test]
fn test_phases_run_in_order() {
    let runtime = Runtime::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let (o1, o2, o3) = (order.clone(), order.clone(), order.clone());
    runtime
        .promise(
            move |res| {
                thread::sleep(Duration::from_millis(50));
                o1.lock().unwrap().push("body");
                res.resolve();
            },
            move |res| {
                o2.lock().unwrap().push("then");
                res.resolve();
            },
            move |res| {
                o3.lock().unwrap().push("catch");
                res.resolve();
            },
        )
        .unwrap();
    runtime.wait_all();

    assert_eq!(*order.lock().unwrap(), vec!["body", "then"]);
}

#[test]
fn test_barrier_released_once_per_promise() {
    let runtime = Runtime::new();

    for i in 0..10 {
        runtime
            .promise(
                move |res| res.done(i % 2 == 0),
                |res| res.resolve(),
                |res| res.reject(),
            )
            .unwrap();
    }
    runtime.wait_all();

    let stats = runtime.stats();
    assert_eq!(stats.launches, 10);
    assert_eq!(stats.drained, 10);
    assert_eq!(stats.outstanding, 0);
    assert_eq!(stats.units_spawned, 20);
    assert_eq!(stats.failures, 5);
}

#[test]
fn test_panicking_body_runs_catch() {
    let runtime = Runtime::new();
    let caught = Arc::new(AtomicBool::new(false));

    let flag = caught.clone();
    runtime
        .promise(
            |res| {
                if res.capacity() == 1 {
                    panic!("request failed");
                }
                res.resolve();
            },
            |res| res.resolve(),
            move |res| {
                flag.store(true, Ordering::SeqCst);
                res.resolve();
            },
        )
        .unwrap();

    assert!(runtime.wait_all_timeout(Duration::from_secs(5)));
    assert!(caught.load(Ordering::SeqCst));
}

#[test]
fn test_promise_alongside_pool() {
    let sink = Arc::new(MemorySink::new());
    let runtime = Runtime::with_sink(RuntimeOptions::default().logs(true), sink.clone());
    let workers = Arc::new(AtomicUsize::new(0));

    let counter = workers.clone();
    runtime
        .worker_pool(2, move |res| {
            thread::sleep(Duration::from_millis(30));
            counter.fetch_add(1, Ordering::SeqCst);
            res.resolve();
        })
        .unwrap();
    runtime
        .promise(
            |res| {
                thread::sleep(Duration::from_millis(60));
                res.resolve();
            },
            |res| res.resolve(),
            |res| res.resolve(),
        )
        .unwrap();
    runtime.wait_all();

    assert_eq!(workers.load(Ordering::SeqCst), 2);
    assert_eq!(sink.count(&Event::Done("WorkerPool".to_string())), 1);
    assert_eq!(sink.count(&Event::Done("Promise Then".to_string())), 1);
}
