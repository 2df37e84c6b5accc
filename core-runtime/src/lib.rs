//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the ambience player crates:
//! - Logging and tracing setup
//! - Configuration (`CoreConfig` and its builder)
//! - Typed event bus
//!
//! ## Overview
//!
//! Nothing in here knows about tracks or audio resources beyond the bridge
//! trait objects carried in [`CoreConfig`](config::CoreConfig). The catalog
//! and playback crates publish into the [`EventBus`](events::EventBus) and log
//! through `tracing`; the service crate owns initialization.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, FeatureFlags};
pub use error::{Error, Result};
pub use events::{CatalogEvent, CoreEvent, EventBus, EventSeverity, EventStream, PlaybackEvent};
