//! Launchers - Worker Pools and Promises
//!
//! Each launch registers with the [`JoinBarrier`], then hands its work to a
//! supervising thread. The supervisor spawns the units, drains their
//! completion signals through a [`Resolver`] channel and releases the
//! barrier once everything reported.

mod barrier;
pub(crate) mod pool;
pub(crate) mod promise;
mod resolver;

pub use barrier::JoinBarrier;
pub use resolver::Resolver;

pub(crate) use resolver::Completion;

use crate::diagnostics::Event;
use crate::runtime::{RuntimeOptions, Shared};
use std::io;
use std::thread;

/// Start a detached thread named after the runtime and its role
pub(crate) fn spawn<F>(options: &RuntimeOptions, role: &str, f: F) -> io::Result<()>
where
    F: FnOnce() + Send + 'static,
{
    let name = format!("{}-{}", options.thread_name, role);
    if name.contains('\0') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("thread name {:?} contains a nul byte", name),
        ));
    }
    let mut builder = thread::Builder::new().name(name);
    if let Some(size) = options.stack_size {
        builder = builder.stack_size(size);
    }
    builder.spawn(f).map(drop)
}

/// Run one unit of work against a fresh handle from `completion`.
///
/// If the thread cannot be started the unit counts as failed.
pub(crate) fn spawn_unit<F>(shared: &Shared, completion: &Completion, role: &str, work: F)
where
    F: FnOnce(Resolver) + Send + 'static,
{
    let resolver = completion.resolver();
    shared.counters.unit_spawned();
    if spawn(&shared.options, role, move || work(resolver)).is_err() {
        // The closure, and the resolver inside it, were dropped unsignaled.
        completion.report(false);
    }
}

/// Drain every signal of `completion`, report, then release the barrier.
pub(crate) fn settle(shared: &Shared, completion: &Completion) {
    let failures = completion.drain(&shared.diagnostics);
    shared.counters.failures_reported(failures);
    shared
        .diagnostics
        .emit(Event::Done(completion.label().to_string()));
    shared.counters.launch_drained();
    shared.barrier.done();
}
