//! Fixed-size worker pools sharing one resolver

use crate::launch::{settle, spawn, spawn_unit, Completion};
use crate::runtime::Shared;
use crate::{Resolver, SyncError, SyncResult};
use std::sync::Arc;

/// Label used when the caller does not name the pool
pub(crate) const DEFAULT_LABEL: &str = "WorkerPool";

/// Register with the barrier and start `count` units of `work`.
///
/// Returns as soon as the supervising thread is running.
pub(crate) fn launch<F>(shared: &Arc<Shared>, label: &str, count: usize, work: F) -> SyncResult<()>
where
    F: Fn(Resolver) + Send + Sync + 'static,
{
    if count == 0 {
        return Err(SyncError::InvalidCount(count));
    }

    let work = Arc::new(work);
    let label: Arc<str> = Arc::from(label);

    shared.barrier.add();
    shared.counters.launch_started();

    let supervisor = Arc::clone(shared);
    let started = spawn(&shared.options, "pool", move || {
        supervise(&supervisor, label, count, work)
    });

    if let Err(err) = started {
        shared.counters.launch_abandoned();
        shared.barrier.done();
        return Err(SyncError::Spawn(err));
    }
    Ok(())
}

fn supervise<F>(shared: &Shared, label: Arc<str>, count: usize, work: Arc<F>)
where
    F: Fn(Resolver) + Send + Sync + 'static,
{
    let completion = Completion::new(label, count);
    for _ in 0..count {
        let work = Arc::clone(&work);
        spawn_unit(shared, &completion, "worker", move |resolver| (*work)(resolver));
    }
    settle(shared, &completion);
}
