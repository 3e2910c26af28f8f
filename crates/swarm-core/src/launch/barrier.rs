//! Join barrier counting outstanding launches

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Counter of launches that have not drained yet
///
/// Every launch calls [`add`](Self::add) before it starts and
/// [`done`](Self::done) once its completion signals are drained.
/// [`wait`](Self::wait) blocks until the count is back to zero.
///
/// Waiting from several threads at once, or launching while a wait is in
/// progress, is not supported.
#[derive(Default)]
pub struct JoinBarrier {
    outstanding: Mutex<usize>,
    drained: Condvar,
}

impl JoinBarrier {
    /// Create a barrier with nothing outstanding
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one launch
    pub fn add(&self) {
        *self.outstanding.lock() += 1;
    }

    /// Release one launch, waking waiters when the count reaches zero
    pub fn done(&self) {
        let mut outstanding = self.outstanding.lock();
        debug_assert!(*outstanding > 0, "join barrier released more than registered");
        *outstanding = outstanding.saturating_sub(1);
        if *outstanding == 0 {
            self.drained.notify_all();
        }
    }

    /// Number of launches still registered
    pub fn outstanding(&self) -> usize {
        *self.outstanding.lock()
    }

    /// Block until no launch is outstanding
    pub fn wait(&self) {
        let mut outstanding = self.outstanding.lock();
        while *outstanding > 0 {
            self.drained.wait(&mut outstanding);
        }
    }

    /// Block until no launch is outstanding or `timeout` elapses.
    ///
    /// Returns `true` if the barrier drained in time. A timeout too large to
    /// represent as a deadline waits without limit.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut outstanding = self.outstanding.lock();
        while *outstanding > 0 {
            if self.drained.wait_until(&mut outstanding, deadline).timed_out() {
                return *outstanding == 0;
            }
        }
        true
    }
}
