//! # Core Configuration Module
//!
//! Configuration for the ambience player core.
//!
//! ## Overview
//!
//! A `CoreConfig` holds the host bridges the core talks to and the tunables
//! of the playback session. It is built through [`CoreConfigBuilder`], which
//! fills in defaults and runs fail-fast validation so misconfiguration shows
//! up at startup instead of on the first play command.
//!
//! ## Optional Bridges
//!
//! - `AudioBackend`: platform audio engine. Without one the core plays in
//!   simulated, clock-driven mode.
//! - `RemoteListing`: remote storage listing. Without one the bundled static
//!   catalog is served.
//!
//! Neither bridge is required unless [`FeatureFlags::require_native_audio`]
//! is set, in which case a missing `AudioBackend` is a
//! [`Error::CapabilityMissing`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .audio_backend(Arc::new(MyAudioEngine::new()))
//!     .poll_interval(Duration::from_millis(500))
//!     .initial_volume(0.8)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // Poll intervals below 100ms are rejected
//! let config = CoreConfig::builder()
//!     .poll_interval(std::time::Duration::from_millis(10))
//!     .build()
//!     .expect("Should fail - poll interval too short");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{AudioBackend, RemoteListing};
use std::sync::Arc;
use std::time::Duration;

/// Default progress poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Longest accepted poll interval.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Core configuration for the ambience player.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Platform audio engine (optional, simulated playback when absent)
    pub audio_backend: Option<Arc<dyn AudioBackend>>,

    /// Remote storage listing (optional, bundled catalog when absent)
    pub remote_listing: Option<Arc<dyn RemoteListing>>,

    /// How often the playback position is polled while playing
    pub poll_interval: Duration,

    /// Volume of the session before the user changes it, `0.0..=1.0`
    pub initial_volume: f32,

    /// Per-subscriber buffer of the event bus
    pub event_buffer_size: usize,

    pub features: FeatureFlags,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field(
                "audio_backend",
                &self.audio_backend.as_ref().map(|backend| backend.name().to_string()),
            )
            .field(
                "remote_listing",
                &self.remote_listing.as_ref().map(|_| "RemoteListing { ... }"),
            )
            .field("poll_interval", &self.poll_interval)
            .field("initial_volume", &self.initial_volume)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("features", &self.features)
            .finish()
    }
}

/// Feature flags controlling optional behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Switch to simulated playback when a resource fails to load. When
    /// disabled the session returns to idle instead.
    pub simulate_on_acquire_failure: bool,

    /// Allow arming the sleep timer
    pub enable_sleep_timer: bool,

    /// Refuse to start without a platform `AudioBackend`
    pub require_native_audio: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            simulate_on_acquire_failure: true,
            enable_sleep_timer: true,
            require_native_audio: false,
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            audio_backend: None,
            remote_listing: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            initial_volume: 1.0,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            features: FeatureFlags::default(),
        }
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// This checks:
    /// - Poll interval is within 100ms..=10s
    /// - Initial volume is a number within 0.0..=1.0
    /// - Event buffer holds at least one event
    /// - Feature flags are consistent with the provided bridges
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval < MIN_POLL_INTERVAL || self.poll_interval > MAX_POLL_INTERVAL {
            return Err(Error::Config(format!(
                "Poll interval must be between {}ms and {}ms, got {}ms",
                MIN_POLL_INTERVAL.as_millis(),
                MAX_POLL_INTERVAL.as_millis(),
                self.poll_interval.as_millis()
            )));
        }

        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(Error::Config(format!(
                "Initial volume must be between 0.0 and 1.0, got {}",
                self.initial_volume
            )));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.features.require_native_audio && self.audio_backend.is_none() {
            return Err(audio_backend_missing_error());
        }

        Ok(())
    }

    /// Whether playback will use a real platform engine.
    pub fn has_native_audio(&self) -> bool {
        self.audio_backend
            .as_ref()
            .map(|backend| backend.is_native())
            .unwrap_or(false)
    }
}

fn audio_backend_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "AudioBackend".to_string(),
        message: "Native audio is required but no AudioBackend was provided. \
                  Inject the platform audio engine with .audio_backend() or \
                  disable require_native_audio to allow simulated playback."
            .to_string(),
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    audio_backend: Option<Arc<dyn AudioBackend>>,
    remote_listing: Option<Arc<dyn RemoteListing>>,
    poll_interval: Option<Duration>,
    initial_volume: Option<f32>,
    event_buffer_size: Option<usize>,
    features: FeatureFlags,
}

impl CoreConfigBuilder {
    /// Sets the platform audio engine.
    pub fn audio_backend(mut self, backend: Arc<dyn AudioBackend>) -> Self {
        self.audio_backend = Some(backend);
        self
    }

    /// Sets the remote listing used to populate the catalog.
    pub fn remote_listing(mut self, listing: Arc<dyn RemoteListing>) -> Self {
        self.remote_listing = Some(listing);
        self
    }

    /// Sets the progress poll interval (default: 1 second).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Sets the session's starting volume (default: 1.0).
    pub fn initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = Some(volume);
        self
    }

    /// Sets the event bus buffer size (default: 100).
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Enables or disables simulated playback after acquisition failures.
    pub fn simulate_on_acquire_failure(mut self, enabled: bool) -> Self {
        self.features.simulate_on_acquire_failure = enabled;
        self
    }

    pub fn enable_sleep_timer(mut self, enabled: bool) -> Self {
        self.features.enable_sleep_timer = enabled;
        self
    }

    /// Fail `build()` when no `AudioBackend` is provided.
    pub fn require_native_audio(mut self, required: bool) -> Self {
        self.features.require_native_audio = required;
        self
    }

    /// Replaces all feature flags at once.
    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Builds and validates the final `CoreConfig`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when a value is out of range
    /// - [`Error::CapabilityMissing`] when a required bridge is absent
    pub fn build(self) -> Result<CoreConfig> {
        let config = CoreConfig {
            audio_backend: self.audio_backend,
            remote_listing: self.remote_listing,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            initial_volume: self.initial_volume.unwrap_or(1.0),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            features: self.features,
        };

        config.validate()?;

        Ok(config)
    }
}
