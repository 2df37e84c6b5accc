//! Task spawning.
//!
//! Background work in the core (progress polling, sleep timers, releasing a
//! stale audio resource) runs as spawned tasks. Long-lived tasks are stopped
//! through a [`CancellationToken`](crate::sync::CancellationToken) rather than
//! by aborting, so they can leave state consistent on the way out.
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async { 7 });
//!     assert_eq!(handle.await.unwrap(), 7);
//! }
//! ```

pub use tokio::task::{yield_now, AbortHandle, JoinError, JoinHandle};

/// Spawns a new asynchronous task on the current runtime.
///
/// The task may run on a different worker thread, so the future must be
/// `Send + 'static`.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
