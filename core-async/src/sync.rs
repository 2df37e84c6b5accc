//! Synchronization primitives.
//!
//! Async-aware locks and channels re-exported from Tokio, plus the
//! cancellation token used to stop long-running background tasks.
//!
//! Session state in the playback controller is guarded by a synchronous
//! `parking_lot` lock that is never held across an `.await`; the primitives
//! here are for the places where waiting is the point (channels, notify).
//!
//! ```rust
//! use core_async::sync::watch;
//!
//! let (tx, rx) = watch::channel(0u32);
//! tx.send_replace(1);
//! assert_eq!(*rx.borrow(), 1);
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};

pub use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};
