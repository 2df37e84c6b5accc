//! Time-related abstractions.
//!
//! `Instant` is Tokio's instant rather than `std::time::Instant`: it follows
//! the runtime clock, so code measuring elapsed playback time (the simulated
//! audio resource in particular) observes `tokio::time::pause`/`advance` in
//! tests exactly like timers do.
//!
//! ```rust
//! use core_async::time::{interval, Duration, MissedTickBehavior};
//!
//! async fn poll_every_second() {
//!     let mut ticker = interval(Duration::from_secs(1));
//!     ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
//!     ticker.tick().await; // first tick completes immediately
//! }
//! ```

pub use std::time::Duration;
pub use tokio::time::{
    interval, interval_at, sleep, sleep_until, timeout, Instant, Interval, MissedTickBehavior,
    Sleep, Timeout,
};

/// Error returned by [`timeout`] when the deadline elapses first.
pub use tokio::time::error::Elapsed;
