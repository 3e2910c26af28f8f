//! A promise chain running next to a small worker pool

use crate::output::StyledOutput;
use std::thread;
use std::time::Duration;
use swarm_core::Runtime;

pub fn run(
    runtime: &Runtime,
    out: &mut StyledOutput,
    fail: bool,
    delay_ms: u64,
) -> anyhow::Result<()> {
    out.heading("Promise next to a pool of 2 workers");
    let tick = Duration::from_millis(delay_ms / 3);

    runtime.worker_pool(2, move |res| {
        for _ in 0..3 {
            thread::sleep(tick);
            println!("worker");
        }
        res.resolve();
    })?;

    runtime.promise(
        move |res| {
            println!("new promise");
            thread::sleep(Duration::from_millis(delay_ms));
            res.done(!fail);
        },
        |res| {
            println!("then");
            res.resolve();
        },
        |res| {
            println!("catch");
            res.resolve();
        },
    )?;

    thread::sleep(tick);
    out.info("main program");
    runtime.wait_all();

    if fail {
        out.warning("promise rejected, catch branch ran");
    } else {
        out.success("promise resolved, then branch ran");
    }
    Ok(())
}
