//! π with the Leibniz series, sequential and on a worker pool
//!
//! The parallel version scatters term ranges to the workers over one channel
//! and gathers partial sums over another.

use crate::output::StyledOutput;
use crossbeam::channel;
use std::time::Instant;
use swarm_core::Runtime;

/// Range of series terms handed to one worker
#[derive(Debug, Clone, Copy)]
struct Step {
    start: u64,
    len: u64,
}

/// Sum of the Leibniz terms `start..end`
pub fn leibniz(start: u64, end: u64) -> f64 {
    (start..end)
        .map(|k| {
            let term = 4.0 / (2 * k + 1) as f64;
            if k % 2 == 0 {
                term
            } else {
                -term
            }
        })
        .sum()
}

/// Split `steps` terms over `threads` pool workers and add up their sums.
pub fn parallel_pi(runtime: &Runtime, steps: u64, threads: usize) -> anyhow::Result<f64> {
    let (scatter_tx, scatter_rx) = channel::bounded::<Step>(threads.max(1));
    let (gather_tx, gather_rx) = channel::bounded::<f64>(threads.max(1));

    runtime.worker_pool_labeled("pi", threads, move |res| match scatter_rx.recv() {
        Ok(step) => {
            let partial = leibniz(step.start, step.start + step.len);
            res.done(gather_tx.send(partial).is_ok());
        }
        Err(_) => res.reject(),
    })?;

    let block = steps / threads as u64;
    for i in 0..threads as u64 {
        let start = block * i;
        let len = if i + 1 == threads as u64 {
            steps - start
        } else {
            block
        };
        scatter_tx.send(Step { start, len })?;
    }

    let mut pi = 0.0;
    for _ in 0..threads {
        pi += gather_rx.recv()?;
    }
    runtime.wait_all();
    Ok(pi)
}

pub fn run_parallel(
    runtime: &Runtime,
    out: &mut StyledOutput,
    steps: u64,
    threads: usize,
) -> anyhow::Result<()> {
    out.heading(&format!("π over {} terms on {} workers", steps, threads));
    let started = Instant::now();
    let pi = parallel_pi(runtime, steps, threads)?;
    out.success(&format!("{} ({:.2?})", pi, started.elapsed()));
    Ok(())
}

pub fn run_sequential(out: &mut StyledOutput, steps: u64) {
    out.heading(&format!("π over {} terms on one thread", steps));
    let started = Instant::now();
    let pi = leibniz(0, steps);
    out.success(&format!("{} ({:.2?})", pi, started.elapsed()));
}
