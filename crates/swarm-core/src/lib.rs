//! Swarm concurrency toolkit
//!
//! This crate provides, on top of plain OS threads:
//! - Worker pools whose units share one completion [`Resolver`]
//! - Promise-style launches with a success and a failure continuation
//! - A join barrier that [`wait_all`] blocks on until every launch drained
//! - Named mutexes and counting semaphores looked up by string key
//!
//! Every operation exists twice: as a method on an explicit [`Runtime`], and
//! as a free function below that forwards to [`Runtime::global`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod diagnostics;
pub mod launch;
pub mod runtime;
pub mod sync;

use std::time::Duration;

pub use diagnostics::{ConsoleSink, DiagnosticSink, Event, MemorySink};
pub use launch::{JoinBarrier, Resolver};
pub use runtime::{Runtime, RuntimeOptions, RuntimeStats};
pub use sync::{MutexGuard, Registry, SemaphorePermit};

/// Errors reported by launches and the named lock registry
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No mutex was initialized under this key
    #[error("Mutex {0:?} not found")]
    MutexNotFound(String),

    /// No semaphore was initialized under this key
    #[error("Semaphore {0:?} not found")]
    SemaphoreNotFound(String),

    /// A worker pool needs at least one worker
    #[error("Invalid worker count: {0}")]
    InvalidCount(usize),

    /// A semaphore needs at least one permit
    #[error("Invalid semaphore capacity: {0}")]
    InvalidCapacity(usize),

    /// Unlock called on a mutex nobody holds
    #[error("Mutex {0:?} is not locked")]
    NotLocked(String),

    /// Release called on a semaphore with every permit available
    #[error("Semaphore {0:?} has no permits held")]
    NoPermitsHeld(String),

    /// The OS refused to start a thread
    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type SyncResult<T> = Result<T, SyncError>;

/// Launch `count` concurrent units of `work` on the global runtime.
pub fn worker_pool<F>(count: usize, work: F) -> SyncResult<()>
where
    F: Fn(Resolver) + Send + Sync + 'static,
{
    Runtime::global().worker_pool(count, work)
}

/// Launch a promise chain on the global runtime.
pub fn promise<B, S, C>(body: B, on_success: S, on_failure: C) -> SyncResult<()>
where
    B: FnOnce(Resolver) + Send + 'static,
    S: FnOnce(Resolver) + Send + 'static,
    C: FnOnce(Resolver) + Send + 'static,
{
    Runtime::global().promise(body, on_success, on_failure)
}

/// Block until every launch on the global runtime has drained.
pub fn wait_all() {
    Runtime::global().wait_all()
}

/// Like [`wait_all`], giving up after `timeout`. Returns `true` if drained.
pub fn wait_all_timeout(timeout: Duration) -> bool {
    Runtime::global().wait_all_timeout(timeout)
}

/// Toggle diagnostics on the global runtime.
pub fn activate_logs(enabled: bool) {
    Runtime::global().activate_logs(enabled)
}

/// Install a fresh mutex under `key` in the global registry.
pub fn init_mutex(key: &str) {
    Runtime::global().init_mutex(key)
}

/// Remove the mutex registered under `key`.
pub fn delete_mutex(key: &str) {
    Runtime::global().delete_mutex(key)
}

/// Block until the mutex under `key` is held.
pub fn lock(key: &str) -> SyncResult<()> {
    Runtime::global().lock(key)
}

/// Release the mutex under `key`.
pub fn unlock(key: &str) -> SyncResult<()> {
    Runtime::global().unlock(key)
}

/// Install a fresh semaphore with `capacity` permits under `key`.
pub fn init_semaphore(key: &str, capacity: usize) -> SyncResult<()> {
    Runtime::global().init_semaphore(key, capacity)
}

/// Remove the semaphore registered under `key`.
pub fn delete_semaphore(key: &str) {
    Runtime::global().delete_semaphore(key)
}

/// Block until a permit of the semaphore under `key` is held.
pub fn acquire(key: &str) -> SyncResult<()> {
    Runtime::global().acquire(key)
}

/// Return a permit to the semaphore under `key`.
pub fn release(key: &str) -> SyncResult<()> {
    Runtime::global().release(key)
}
