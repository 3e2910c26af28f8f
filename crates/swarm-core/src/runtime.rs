//! Runtime: the process-scoped state behind every launch and named lock

use crate::diagnostics::{ConsoleSink, DiagnosticSink, Diagnostics, Event};
use crate::launch::{pool, promise, JoinBarrier};
use crate::sync::{MutexGuard, Registry, SemaphorePermit};
use crate::{Resolver, SyncResult};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use termcolor::ColorChoice;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Emit diagnostics from the start
    pub logs: bool,

    /// Color mode of the console sink
    pub color: ColorChoice,

    /// Prefix of every spawned thread's name
    pub thread_name: String,

    /// Stack size of spawned threads in bytes (None = platform default)
    pub stack_size: Option<usize>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            logs: false,
            color: ColorChoice::Auto,
            thread_name: "swarm".to_string(),
            stack_size: None,
        }
    }
}

impl RuntimeOptions {
    /// Set whether diagnostics start enabled
    pub fn logs(mut self, enabled: bool) -> Self {
        self.logs = enabled;
        self
    }

    /// Set the console color mode
    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the thread name prefix
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the stack size of spawned threads
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

/// Runtime statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Pool and promise launches accepted
    pub launches: u64,

    /// Launches whose completion signals were all drained
    pub drained: u64,

    /// Launches still registered with the join barrier
    pub outstanding: usize,

    /// Units of work handed to a thread (pool workers, promise phases)
    pub units_spawned: u64,

    /// Units that reported failure during a drain
    pub failures: u64,
}

#[derive(Default)]
pub(crate) struct Counters {
    launches: AtomicU64,
    drained: AtomicU64,
    units_spawned: AtomicU64,
    failures: AtomicU64,
}

impl Counters {
    pub(crate) fn launch_started(&self) {
        self.launches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn launch_abandoned(&self) {
        self.launches.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn launch_drained(&self) {
        self.drained.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn unit_spawned(&self) {
        self.units_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failures_reported(&self, count: usize) {
        self.failures.fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// State shared by a runtime and every supervising thread it started
pub(crate) struct Shared {
    pub(crate) options: RuntimeOptions,
    pub(crate) barrier: JoinBarrier,
    pub(crate) registry: Registry,
    pub(crate) diagnostics: Arc<Diagnostics>,
    pub(crate) counters: Counters,
}

static GLOBAL: Lazy<Runtime> = Lazy::new(Runtime::new);

/// Handle to a join barrier, a lock registry and a diagnostics switch
///
/// Cloning is cheap and every clone refers to the same state, so a runtime
/// can be moved into the work it launches.
#[derive(Clone)]
pub struct Runtime {
    shared: Arc<Shared>,
}

impl Runtime {
    /// Create a runtime with default options
    pub fn new() -> Self {
        Self::with_options(RuntimeOptions::default())
    }

    /// Create a runtime printing diagnostics to the console
    pub fn with_options(options: RuntimeOptions) -> Self {
        let sink = Arc::new(ConsoleSink::new(options.color));
        Self::with_sink(options, sink)
    }

    /// Create a runtime sending diagnostics to `sink`
    pub fn with_sink(options: RuntimeOptions, sink: Arc<dyn DiagnosticSink>) -> Self {
        let diagnostics = Arc::new(Diagnostics::new(sink));
        diagnostics.set_enabled(options.logs);
        Self {
            shared: Arc::new(Shared {
                options,
                barrier: JoinBarrier::new(),
                registry: Registry::new(),
                diagnostics,
                counters: Counters::default(),
            }),
        }
    }

    /// The process-wide runtime used by the crate's free functions
    pub fn global() -> &'static Runtime {
        &GLOBAL
    }

    /// Get the options this runtime was built with
    pub fn options(&self) -> &RuntimeOptions {
        &self.shared.options
    }

    // ── Launches ─────────────────────────────────────────────────────

    /// Launch `count` concurrent units of `work` sharing one resolver.
    ///
    /// Returns immediately. Completion is observed through
    /// [`wait_all`](Self::wait_all).
    pub fn worker_pool<F>(&self, count: usize, work: F) -> SyncResult<()>
    where
        F: Fn(Resolver) + Send + Sync + 'static,
    {
        pool::launch(&self.shared, pool::DEFAULT_LABEL, count, work)
    }

    /// Like [`worker_pool`](Self::worker_pool), reporting under `label`.
    pub fn worker_pool_labeled<F>(&self, label: &str, count: usize, work: F) -> SyncResult<()>
    where
        F: Fn(Resolver) + Send + Sync + 'static,
    {
        pool::launch(&self.shared, label, count, work)
    }

    /// Run `body`, then `on_success` if it resolved or `on_failure` if it
    /// rejected. Returns immediately.
    pub fn promise<B, S, C>(&self, body: B, on_success: S, on_failure: C) -> SyncResult<()>
    where
        B: FnOnce(Resolver) + Send + 'static,
        S: FnOnce(Resolver) + Send + 'static,
        C: FnOnce(Resolver) + Send + 'static,
    {
        promise::launch(
            &self.shared,
            promise::DEFAULT_LABEL,
            body,
            on_success,
            on_failure,
        )
    }

    /// Like [`promise`](Self::promise); phases report as
    /// `<label> Init`, `<label> Then` and `<label> Catch`.
    pub fn promise_labeled<B, S, C>(
        &self,
        label: &str,
        body: B,
        on_success: S,
        on_failure: C,
    ) -> SyncResult<()>
    where
        B: FnOnce(Resolver) + Send + 'static,
        S: FnOnce(Resolver) + Send + 'static,
        C: FnOnce(Resolver) + Send + 'static,
    {
        promise::launch(&self.shared, label, body, on_success, on_failure)
    }

    /// Block until every launch has drained
    pub fn wait_all(&self) {
        self.shared.barrier.wait();
    }

    /// Block until every launch has drained or `timeout` elapses.
    ///
    /// Returns `true` if everything drained in time.
    pub fn wait_all_timeout(&self, timeout: Duration) -> bool {
        self.shared.barrier.wait_timeout(timeout)
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Enable or disable diagnostics. The banner is printed the first time.
    pub fn activate_logs(&self, enabled: bool) {
        self.shared.diagnostics.set_enabled(enabled);
    }

    /// Check whether diagnostics are enabled
    pub fn logs_enabled(&self) -> bool {
        self.shared.diagnostics.is_enabled()
    }

    /// Snapshot of the runtime counters
    pub fn stats(&self) -> RuntimeStats {
        let counters = &self.shared.counters;
        RuntimeStats {
            launches: counters.launches.load(Ordering::Relaxed),
            drained: counters.drained.load(Ordering::Relaxed),
            outstanding: self.shared.barrier.outstanding(),
            units_spawned: counters.units_spawned.load(Ordering::Relaxed),
            failures: counters.failures.load(Ordering::Relaxed),
        }
    }

    // ── Named mutexes ────────────────────────────────────────────────

    /// Install a fresh mutex under `key`, replacing any previous one
    pub fn init_mutex(&self, key: &str) {
        self.shared.registry.init_mutex(key);
    }

    /// Remove the mutex under `key`
    pub fn delete_mutex(&self, key: &str) {
        self.shared.registry.delete_mutex(key);
    }

    /// Block until the mutex under `key` is held by the caller
    pub fn lock(&self, key: &str) -> SyncResult<()> {
        let mutex = self.shared.registry.mutex(key)?;
        mutex.lock();
        self.emit(Event::EnterCritical(key.to_string()));
        Ok(())
    }

    /// Take the mutex under `key` if it is free
    pub fn try_lock(&self, key: &str) -> SyncResult<bool> {
        let mutex = self.shared.registry.mutex(key)?;
        let locked = mutex.try_lock();
        if locked {
            self.emit(Event::EnterCritical(key.to_string()));
        }
        Ok(locked)
    }

    /// Free the mutex under `key`
    pub fn unlock(&self, key: &str) -> SyncResult<()> {
        let mutex = self.shared.registry.mutex(key)?;
        mutex.unlock()?;
        self.emit(Event::LeaveCritical(key.to_string()));
        Ok(())
    }

    /// Lock the mutex under `key` and unlock it when the guard drops
    pub fn lock_guard(&self, key: &str) -> SyncResult<MutexGuard> {
        let mutex = self.shared.registry.mutex(key)?;
        mutex.lock();
        self.emit(Event::EnterCritical(key.to_string()));
        Ok(MutexGuard::new(mutex, self.shared.diagnostics.clone()))
    }

    /// Get the number of registered mutexes
    pub fn mutex_count(&self) -> usize {
        self.shared.registry.mutex_count()
    }

    // ── Named semaphores ─────────────────────────────────────────────

    /// Install a fresh semaphore with `capacity` permits under `key`
    pub fn init_semaphore(&self, key: &str, capacity: usize) -> SyncResult<()> {
        self.shared.registry.init_semaphore(key, capacity).map(drop)
    }

    /// Remove the semaphore under `key`
    pub fn delete_semaphore(&self, key: &str) {
        self.shared.registry.delete_semaphore(key);
    }

    /// Block until a permit of the semaphore under `key` is held
    pub fn acquire(&self, key: &str) -> SyncResult<()> {
        let semaphore = self.shared.registry.semaphore(key)?;
        semaphore.acquire();
        self.emit(Event::EnterSemaphore(key.to_string()));
        Ok(())
    }

    /// Take a permit of the semaphore under `key` if one is free
    pub fn try_acquire(&self, key: &str) -> SyncResult<bool> {
        let semaphore = self.shared.registry.semaphore(key)?;
        let acquired = semaphore.try_acquire();
        if acquired {
            self.emit(Event::EnterSemaphore(key.to_string()));
        }
        Ok(acquired)
    }

    /// Return a permit to the semaphore under `key`
    pub fn release(&self, key: &str) -> SyncResult<()> {
        let semaphore = self.shared.registry.semaphore(key)?;
        semaphore.release()?;
        self.emit(Event::LeaveSemaphore(key.to_string()));
        Ok(())
    }

    /// Acquire a permit under `key` and release it when the permit drops
    pub fn acquire_guard(&self, key: &str) -> SyncResult<SemaphorePermit> {
        let semaphore = self.shared.registry.semaphore(key)?;
        semaphore.acquire();
        self.emit(Event::EnterSemaphore(key.to_string()));
        Ok(SemaphorePermit::new(
            semaphore,
            self.shared.diagnostics.clone(),
        ))
    }

    /// Get the free permits of the semaphore under `key`
    pub fn available_permits(&self, key: &str) -> SyncResult<usize> {
        Ok(self.shared.registry.semaphore(key)?.available_permits())
    }

    /// Get the number of registered semaphores
    pub fn semaphore_count(&self) -> usize {
        self.shared.registry.semaphore_count()
    }

    fn emit(&self, event: Event) {
        self.shared.diagnostics.emit(event);
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
