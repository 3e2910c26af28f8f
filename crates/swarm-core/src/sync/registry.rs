//! Registry of named mutexes and semaphores

use crate::sync::{Mutex, Semaphore};
use crate::{SyncError, SyncResult};
use parking_lot::Mutex as Gate;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Lookup table from string keys to mutexes and semaphores
///
/// Each map sits behind its own gate. The gate is only held while the map is
/// read or changed; blocking `lock`/`acquire` calls happen on the resolved
/// handle after the gate is released.
///
/// Deleting or re-initializing a key while other threads hold or wait on it
/// is caller misuse: those threads keep the old handle, later lookups see
/// the new entry (or none).
#[derive(Default)]
pub struct Registry {
    /// Map of key to mutex
    mutexes: Gate<FxHashMap<String, Arc<Mutex>>>,

    /// Map of key to semaphore
    semaphores: Gate<FxHashMap<String, Arc<Semaphore>>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh mutex under `key`, replacing any previous one
    pub fn init_mutex(&self, key: &str) -> Arc<Mutex> {
        let mutex = Arc::new(Mutex::new(key));
        self.mutexes.lock().insert(key.to_string(), mutex.clone());
        mutex
    }

    /// Remove the mutex registered under `key`
    pub fn delete_mutex(&self, key: &str) -> Option<Arc<Mutex>> {
        self.mutexes.lock().remove(key)
    }

    /// Get the mutex registered under `key`
    pub fn mutex(&self, key: &str) -> SyncResult<Arc<Mutex>> {
        self.mutexes
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| SyncError::MutexNotFound(key.to_string()))
    }

    /// Install a fresh semaphore under `key`, replacing any previous one
    pub fn init_semaphore(&self, key: &str, capacity: usize) -> SyncResult<Arc<Semaphore>> {
        let semaphore = Arc::new(Semaphore::new(key, capacity)?);
        self.semaphores
            .lock()
            .insert(key.to_string(), semaphore.clone());
        Ok(semaphore)
    }

    /// Remove the semaphore registered under `key`
    pub fn delete_semaphore(&self, key: &str) -> Option<Arc<Semaphore>> {
        self.semaphores.lock().remove(key)
    }

    /// Get the semaphore registered under `key`
    pub fn semaphore(&self, key: &str) -> SyncResult<Arc<Semaphore>> {
        self.semaphores
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| SyncError::SemaphoreNotFound(key.to_string()))
    }

    /// Get the number of registered mutexes
    pub fn mutex_count(&self) -> usize {
        self.mutexes.lock().len()
    }

    /// Get the number of registered semaphores
    pub fn semaphore_count(&self) -> usize {
        self.semaphores.lock().len()
    }
}
