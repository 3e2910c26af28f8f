//! Named mutex with explicit lock/unlock calls

use crate::{SyncError, SyncResult};
use parking_lot::{Condvar, Mutex as ParkingLotMutex};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Single-slot lock identified by a string key
///
/// Unlike `std::sync::Mutex`, locking does not hand out a guard bound to the
/// caller's scope: [`lock`](Self::lock) and [`unlock`](Self::unlock) are
/// separate calls and may even happen on different threads. Locks are not
/// reentrant; locking twice from the same thread blocks forever.
pub struct Mutex {
    /// Registry key
    key: String,

    /// Whether the slot is taken
    locked: ParkingLotMutex<bool>,

    /// Signaled on every unlock
    unlocked: Condvar,

    /// Threads currently blocked in `lock`
    waiting: AtomicUsize,
}

impl Mutex {
    /// Create an unlocked mutex
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            locked: ParkingLotMutex::new(false),
            unlocked: Condvar::new(),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Get the registry key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Block until the slot is free, then take it
    pub fn lock(&self) {
        let mut locked = self.locked.lock();
        if *locked {
            self.waiting.fetch_add(1, Ordering::AcqRel);
            while *locked {
                self.unlocked.wait(&mut locked);
            }
            self.waiting.fetch_sub(1, Ordering::AcqRel);
        }
        *locked = true;
    }

    /// Take the slot if it is free. Returns `true` on success.
    pub fn try_lock(&self) -> bool {
        let mut locked = self.locked.lock();
        if *locked {
            false
        } else {
            *locked = true;
            true
        }
    }

    /// Free the slot and wake one waiter
    pub fn unlock(&self) -> SyncResult<()> {
        let mut locked = self.locked.lock();
        if !*locked {
            return Err(SyncError::NotLocked(self.key.clone()));
        }
        *locked = false;
        drop(locked);
        self.unlocked.notify_one();
        Ok(())
    }

    /// Check if the slot is taken
    pub fn is_locked(&self) -> bool {
        *self.locked.lock()
    }

    /// Get number of threads blocked in `lock`
    pub fn waiting_count(&self) -> usize {
        self.waiting.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_mutex_creation() {
        let mutex = Mutex::new("m");

        assert_eq!(mutex.key(), "m");
        assert!(!mutex.is_locked());
        assert_eq!(mutex.waiting_count(), 0);
    }

    #[test]
    fn test_mutex_uncontended_lock_unlock() {
        let mutex = Mutex::new("m");

        mutex.lock();
        assert!(mutex.is_locked());

        mutex.unlock().unwrap();
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_mutex_try_lock() {
        let mutex = Mutex::new("m");

        assert!(mutex.try_lock());
        assert!(!mutex.try_lock());

        mutex.unlock().unwrap();
        assert!(mutex.try_lock());
    }

    #[test]
    fn test_mutex_unlock_without_lock() {
        let mutex = Mutex::new("m");

        let result = mutex.unlock();
        assert!(matches!(result, Err(SyncError::NotLocked(key)) if key == "m"));
    }

    #[test]
    fn test_mutex_unlock_from_other_thread() {
        let mutex = Arc::new(Mutex::new("m"));
        mutex.lock();

        let other = mutex.clone();
        thread::spawn(move || other.unlock().unwrap()).join().unwrap();

        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_mutex_blocks_second_locker() {
        let mutex = Arc::new(Mutex::new("m"));
        let entered = Arc::new(AtomicBool::new(false));
        mutex.lock();

        let handle = {
            let mutex = mutex.clone();
            let entered = entered.clone();
            thread::spawn(move || {
                mutex.lock();
                entered.store(true, Ordering::SeqCst);
                mutex.unlock().unwrap();
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!entered.load(Ordering::SeqCst));
        assert_eq!(mutex.waiting_count(), 1);

        mutex.unlock().unwrap();
        handle.join().unwrap();

        assert!(entered.load(Ordering::SeqCst));
        assert_eq!(mutex.waiting_count(), 0);
    }
}
