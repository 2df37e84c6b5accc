//! # Playback Session Module
//!
//! Single-session playback for the ambience player: one current track, one
//! loaded audio resource, progress polling, volume and a sleep timer.
//!
//! ## Overview
//!
//! - [`PlaybackController`] owns the session and serializes commands
//! - [`SessionSnapshot`] is what observers see, published on a `watch` channel
//! - [`SimulatedBackend`] stands in for a platform audio engine, either for
//!   the whole session or per track when acquisition fails
//!
//! ## Usage
//!
//! ```no_run
//! use core_catalog::{StaticCatalog, TrackCatalog, TrackId};
//! use core_playback::{PlaybackConfig, PlaybackController, SimulatedBackend};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = PlaybackController::new(
//!     Arc::new(SimulatedBackend::new()),
//!     PlaybackConfig::default(),
//!     None,
//! )?;
//!
//! let catalog = StaticCatalog::builtin();
//! let track = catalog.lookup_track(&TrackId::from("1")).await?;
//! controller.play_track(track).await;
//!
//! let mut session = controller.subscribe();
//! session.changed().await?;
//! println!("{:?}", session.borrow().status);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
mod poller;
pub mod session;
pub mod simulated;
pub mod sleep_timer;

pub use config::{FallbackPolicy, PlaybackConfig};
pub use controller::{PlaybackController, SeekOffset, DEFAULT_SKIP};
pub use error::{PlaybackError, Result};
pub use session::{PlaybackMode, PlaybackStatus, SessionSnapshot};
pub use simulated::{SimulatedBackend, SimulatedResource};
pub use sleep_timer::{SleepTimerMode, SLEEP_TIMER_PRESETS_MINUTES};
