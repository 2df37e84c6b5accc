//! Runtime abstraction layer for the ambience player core.
//!
//! Every `core-*` crate goes through this crate for task spawning, timers,
//! synchronization and cancellation instead of depending on Tokio directly.
//! Keeping the executor behind one seam means the playback controller, the
//! progress poller and the sleep timer all agree on a single clock, which is
//! what lets tests drive them with Tokio's paused time.
//!
//! # Modules
//!
//! - `task`: task spawning and abort handles
//! - `time`: sleep, intervals and the monotonic `Instant` used for playback clocks
//! - `sync`: async-aware locks and channels
//! - `runtime`: blocking entry points for synchronous callers
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

/// Waits on several branches and runs the first that completes.
pub use tokio::select;

pub use sync::CancellationToken;
pub use task::spawn;
pub use time::{sleep, Duration, Instant};
