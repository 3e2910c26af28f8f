//! Named mutex and semaphore demos

use crate::output::StyledOutput;
use std::thread;
use std::time::{Duration, Instant};
use swarm_core::Runtime;

const MUTEX_KEY: &str = "demo-mutex";
const SEMAPHORE_KEY: &str = "demo-semaphore";

/// Workers entering a critical section one at a time
pub fn run_mutex(
    runtime: &Runtime,
    out: &mut StyledOutput,
    workers: usize,
    hold_ms: u64,
) -> anyhow::Result<()> {
    out.heading(&format!("{} workers sharing mutex {:?}", workers, MUTEX_KEY));
    runtime.init_mutex(MUTEX_KEY);
    let hold = Duration::from_millis(hold_ms);
    let started = Instant::now();

    let rt = runtime.clone();
    runtime.worker_pool_labeled("mutex demo", workers, move |res| {
        let outcome = rt.lock_guard(MUTEX_KEY).map(|_guard| {
            println!("critical section");
            thread::sleep(hold);
        });
        res.done(outcome.is_ok());
    })?;
    runtime.wait_all();
    runtime.delete_mutex(MUTEX_KEY);

    match serialized_time(hold, workers) {
        Some(floor) => out.success(&format!(
            "done in {:.2?} (at least {:.2?} when serialized)",
            started.elapsed(),
            floor
        )),
        None => out.success(&format!("done in {:.2?}", started.elapsed())),
    }
    Ok(())
}

/// Lower bound of the mutex demo's run time, `None` if it does not fit a `Duration`
fn serialized_time(hold: Duration, workers: usize) -> Option<Duration> {
    hold.checked_mul(u32::try_from(workers).ok()?)
}

/// Workers holding at most `permits` slots at a time
pub fn run_semaphore(
    runtime: &Runtime,
    out: &mut StyledOutput,
    workers: usize,
    permits: usize,
    hold_ms: u64,
) -> anyhow::Result<()> {
    out.heading(&format!(
        "{} workers sharing {} permits of {:?}",
        workers, permits, SEMAPHORE_KEY
    ));
    runtime.init_semaphore(SEMAPHORE_KEY, permits)?;
    let hold = Duration::from_millis(hold_ms);
    let started = Instant::now();

    let rt = runtime.clone();
    runtime.worker_pool_labeled("semaphore demo", workers, move |res| {
        let outcome = rt.acquire_guard(SEMAPHORE_KEY).map(|_permit| {
            println!("in semaphore");
            thread::sleep(hold);
        });
        res.done(outcome.is_ok());
    })?;
    runtime.wait_all();
    runtime.delete_semaphore(SEMAPHORE_KEY);

    let rounds = workers.div_ceil(permits.max(1));
    out.success(&format!(
        "done in {:.2?} ({} rounds of {:.2?})",
        started.elapsed(),
        rounds,
        hold
    ));
    Ok(())
}
