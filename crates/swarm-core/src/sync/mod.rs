//! Named synchronization primitives
//!
//! Mutexes and counting semaphores that block the calling OS thread, looked
//! up by string key in a [`Registry`]. Handles are reference counted; lookups
//! clone the handle and release the registry gate before blocking.

mod guard;
mod mutex;
mod registry;
mod semaphore;

pub use guard::{MutexGuard, SemaphorePermit};
pub use mutex::Mutex;
pub use registry::Registry;
pub use semaphore::Semaphore;
