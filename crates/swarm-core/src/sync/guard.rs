//! RAII guards for automatic unlock and release

use crate::diagnostics::{Diagnostics, Event};
use crate::sync::{Mutex, Semaphore};
use crate::SyncResult;
use std::sync::Arc;

/// Held lock on a named mutex (unlocks on drop)
///
/// Keeps its own handle to the mutex, so deleting or re-initializing the key
/// does not affect the guard.
pub struct MutexGuard {
    mutex: Arc<Mutex>,
    diagnostics: Arc<Diagnostics>,
    unlocked: bool,
}

impl MutexGuard {
    /// The caller must already hold `mutex`.
    pub(crate) fn new(mutex: Arc<Mutex>, diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            mutex,
            diagnostics,
            unlocked: false,
        }
    }

    /// Key of the held mutex
    pub fn key(&self) -> &str {
        self.mutex.key()
    }

    /// Unlock early, surfacing any error
    pub fn unlock(mut self) -> SyncResult<()> {
        self.unlock_inner()
    }

    fn unlock_inner(&mut self) -> SyncResult<()> {
        if self.unlocked {
            return Ok(());
        }
        self.unlocked = true;
        self.mutex.unlock()?;
        self.diagnostics
            .emit(Event::LeaveCritical(self.mutex.key().to_string()));
        Ok(())
    }
}

impl Drop for MutexGuard {
    fn drop(&mut self) {
        // Ignore any errors on drop - we're already cleaning up
        let _ = self.unlock_inner();
    }
}

/// Held permit of a named semaphore (released on drop)
pub struct SemaphorePermit {
    semaphore: Arc<Semaphore>,
    diagnostics: Arc<Diagnostics>,
    released: bool,
}

impl SemaphorePermit {
    /// The caller must already hold a permit of `semaphore`.
    pub(crate) fn new(semaphore: Arc<Semaphore>, diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            semaphore,
            diagnostics,
            released: false,
        }
    }

    /// Key of the semaphore
    pub fn key(&self) -> &str {
        self.semaphore.key()
    }

    /// Release early, surfacing any error
    pub fn release(mut self) -> SyncResult<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> SyncResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.semaphore.release()?;
        self.diagnostics
            .emit(Event::LeaveSemaphore(self.semaphore.key().to_string()));
        Ok(())
    }
}

impl Drop for SemaphorePermit {
    fn drop(&mut self) {
        let _ = self.release_inner();
    }
}
