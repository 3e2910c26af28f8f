//! Pool of sleeping workers

use crate::output::StyledOutput;
use rand::Rng;
use std::thread;
use std::time::{Duration, Instant};
use swarm_core::Runtime;

/// Pick how long one worker sleeps: `delay_ms` plus up to `jitter_ms` extra.
pub fn pause(delay_ms: u64, jitter_ms: u64) -> Duration {
    let extra = if jitter_ms == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..=jitter_ms)
    };
    Duration::from_millis(delay_ms + extra)
}

pub fn run(
    runtime: &Runtime,
    out: &mut StyledOutput,
    count: usize,
    delay_ms: u64,
    jitter_ms: u64,
) -> anyhow::Result<()> {
    out.heading(&format!("Pool of {} workers", count));
    let started = Instant::now();

    runtime.worker_pool(count, move |res| {
        println!("worker");
        thread::sleep(pause(delay_ms, jitter_ms));
        res.resolve();
    })?;

    // The pool runs on its own threads; the caller keeps going.
    out.info("main");
    runtime.wait_all();

    out.success(&format!(
        "{} workers finished in {:.2?}",
        count,
        started.elapsed()
    ));
    Ok(())
}
