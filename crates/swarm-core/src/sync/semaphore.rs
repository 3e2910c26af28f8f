//! Named counting semaphore

use crate::{SyncError, SyncResult};
use parking_lot::{Condvar, Mutex as ParkingLotMutex};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counting semaphore identified by a string key
///
/// At most `max_permits` holders at a time. When no permits are available,
/// [`acquire`](Self::acquire) blocks the calling thread until one is released.
pub struct Semaphore {
    /// Registry key
    key: String,

    /// Current number of available permits
    permits: ParkingLotMutex<usize>,

    /// Maximum number of permits (capacity)
    max_permits: usize,

    /// Signaled on every release
    released: Condvar,

    /// Threads currently blocked in `acquire`
    waiting: AtomicUsize,
}

impl Semaphore {
    /// Create a semaphore with `permits` free permits
    pub fn new(key: impl Into<String>, permits: usize) -> SyncResult<Self> {
        if permits == 0 {
            return Err(SyncError::InvalidCapacity(permits));
        }
        Ok(Self {
            key: key.into(),
            permits: ParkingLotMutex::new(permits),
            max_permits: permits,
            released: Condvar::new(),
            waiting: AtomicUsize::new(0),
        })
    }

    /// Get the registry key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the current number of available permits
    pub fn available_permits(&self) -> usize {
        *self.permits.lock()
    }

    /// Get the maximum number of permits
    pub fn max_permits(&self) -> usize {
        self.max_permits
    }

    /// Block until a permit is available, then take it
    pub fn acquire(&self) {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            self.waiting.fetch_add(1, Ordering::AcqRel);
            while *permits == 0 {
                self.released.wait(&mut permits);
            }
            self.waiting.fetch_sub(1, Ordering::AcqRel);
        }
        *permits -= 1;
    }

    /// Take a permit if one is free. Returns `true` on success.
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            false
        } else {
            *permits -= 1;
            true
        }
    }

    /// Return a permit and wake one waiter
    pub fn release(&self) -> SyncResult<()> {
        let mut permits = self.permits.lock();
        if *permits >= self.max_permits {
            return Err(SyncError::NoPermitsHeld(self.key.clone()));
        }
        *permits += 1;
        drop(permits);
        self.released.notify_one();
        Ok(())
    }

    /// Get number of threads blocked in `acquire`
    pub fn waiting_count(&self) -> usize {
        self.waiting.load(Ordering::Acquire)
    }
}
