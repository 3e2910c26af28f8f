//! Completion protocol shared by a launch and its units of work

use crate::diagnostics::{Diagnostics, Event};
use crossbeam::channel::{self, Receiver, Sender};
use std::fmt;
use std::sync::Arc;

/// Completion handle handed to every unit of work
///
/// A unit reports its outcome exactly once, through [`resolve`](Self::resolve),
/// [`reject`](Self::reject) or [`done`](Self::done). All three consume the
/// handle, so a unit cannot report twice.
///
/// Dropping a `Resolver` without reporting leaves the launch waiting for a
/// signal that never comes: the launch and [`wait_all`](crate::wait_all) hang.
/// The one exception is a panic: a handle dropped while its thread unwinds
/// reports failure on the way out.
pub struct Resolver {
    sender: Sender<bool>,
    label: Arc<str>,
    capacity: usize,
    signaled: bool,
}

impl Resolver {
    /// Name of the launch this unit belongs to
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of completions the launch waits for
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Report the outcome of this unit
    pub fn done(mut self, success: bool) {
        self.signal(success);
    }

    /// Report success
    pub fn resolve(self) {
        self.done(true);
    }

    /// Report failure
    pub fn reject(self) {
        self.done(false);
    }

    fn signal(&mut self, success: bool) {
        if self.signaled {
            return;
        }
        self.signaled = true;
        // The buffer holds one slot per unit, so this never blocks. An error
        // means the launch stopped listening, and nobody is left to tell.
        let _ = self.sender.send(success);
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        if !self.signaled && std::thread::panicking() {
            self.signal(false);
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("label", &self.label)
            .field("capacity", &self.capacity)
            .field("signaled", &self.signaled)
            .finish()
    }
}

/// Receiving side of a launch's completion channel
///
/// Keeps a sender of its own, so the channel never disconnects: a missing
/// signal blocks [`recv`](Self::recv) forever instead of failing.
pub(crate) struct Completion {
    sender: Sender<bool>,
    receiver: Receiver<bool>,
    label: Arc<str>,
    capacity: usize,
}

impl Completion {
    pub(crate) fn new(label: impl Into<Arc<str>>, capacity: usize) -> Self {
        let (sender, receiver) = channel::bounded(capacity);
        Self {
            sender,
            receiver,
            label: label.into(),
            capacity,
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    /// Hand out a handle for one unit of work
    pub(crate) fn resolver(&self) -> Resolver {
        Resolver {
            sender: self.sender.clone(),
            label: Arc::clone(&self.label),
            capacity: self.capacity,
            signaled: false,
        }
    }

    /// Report on behalf of a unit that never got to run
    pub(crate) fn report(&self, success: bool) {
        let _ = self.sender.try_send(success);
    }

    /// Block until the next signal arrives
    pub(crate) fn recv(&self) -> bool {
        self.receiver.recv().unwrap_or(false)
    }

    /// Read `capacity` signals, reporting each failure. Returns the failure count.
    pub(crate) fn drain(&self, diagnostics: &Diagnostics) -> usize {
        let mut failures = 0;
        for _ in 0..self.capacity {
            if !self.recv() {
                failures += 1;
                diagnostics.emit(Event::Failed(self.label.to_string()));
            }
        }
        failures
    }
}
