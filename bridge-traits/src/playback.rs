//! Playback bridge traits and supporting audio types.
//!
//! The playback controller talks to the platform audio engine through
//! [`AudioBackend`], which hands out one [`AudioResource`] per loaded track.
//! Native hosts wrap their audio engine here; hosts without native playback
//! (browser shells, headless tests) use the simulated backend shipped with
//! `core-playback`.
//!
//! Status is pull-based: engines in scope only expose a status query, so the
//! controller polls [`AudioResource::status`] instead of subscribing to
//! callbacks.

use crate::{error::Result, platform::PlatformSendSync};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Options supplied when acquiring a resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquireOptions {
    /// Start producing audio as soon as the resource is ready.
    pub autoplay: bool,
    /// Initial volume (0.0 = muted, 1.0 = unity gain).
    pub initial_volume: f32,
    /// Declared length from the catalog. Engines that can probe the stream
    /// ignore it; clock-driven engines use it as the end of the stream.
    pub expected_duration: Option<Duration>,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            initial_volume: 1.0,
            expected_duration: None,
        }
    }
}

impl AcquireOptions {
    /// Set the initial volume, clamped to `0.0..=1.0`.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.initial_volume = clamp_volume(volume);
        self
    }

    /// Set whether the resource starts playing immediately.
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Hint the declared length of the stream.
    pub fn with_expected_duration(mut self, duration: Duration) -> Self {
        self.expected_duration = Some(duration);
        self
    }
}

/// Clamp a volume level into `0.0..=1.0`. NaN maps to muted.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Identifier for a loaded resource, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Generate a new resource identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot returned by [`AudioResource::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceStatus {
    /// Current playback position.
    pub position: Duration,
    /// Total length, when the engine knows it.
    pub duration: Option<Duration>,
    /// Whether the resource is still loaded.
    pub is_loaded: bool,
    /// Set on the first status query after playback reached the end.
    pub did_just_finish: bool,
}

impl ResourceStatus {
    /// Status for a loaded resource at `position`.
    pub fn loaded(position: Duration, duration: Option<Duration>) -> Self {
        Self {
            position,
            duration,
            is_loaded: true,
            did_just_finish: false,
        }
    }

    /// Mark the status as reporting natural completion.
    pub fn finished(mut self) -> Self {
        self.did_just_finish = true;
        self
    }

    /// Duration reported by the engine, ignoring zero-length reports.
    pub fn known_duration(&self) -> Option<Duration> {
        self.duration.filter(|d| !d.is_zero())
    }
}

/// A loaded, platform-backed audio stream.
///
/// Dropping the last handle without calling [`unload`](AudioResource::unload)
/// leaks the native resource on some platforms; the controller always unloads
/// explicitly.
#[async_trait::async_trait]
pub trait AudioResource: PlatformSendSync {
    /// Identifier of this resource.
    fn id(&self) -> ResourceId;

    /// Begin or resume playback.
    async fn play(&self) -> Result<()>;

    /// Pause playback without releasing the resource.
    async fn pause(&self) -> Result<()>;

    /// Stop playback and rewind to the start.
    async fn stop(&self) -> Result<()>;

    /// Release the underlying native resource. Further calls may fail with
    /// [`BridgeError::ResourceUnloaded`](crate::BridgeError::ResourceUnloaded).
    async fn unload(&self) -> Result<()>;

    /// Seek to an absolute position.
    async fn seek(&self, position: Duration) -> Result<()>;

    /// Adjust volume. Volume is normalized to `0.0..=1.0`.
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Query the current status.
    async fn status(&self) -> Result<ResourceStatus>;
}

/// Platform audio engine capable of loading resources by location.
#[async_trait::async_trait]
pub trait AudioBackend: PlatformSendSync {
    /// Short name used in logs (e.g. `"avfoundation"`, `"simulated"`).
    fn name(&self) -> &str;

    /// Whether the backend produces real audio output.
    fn is_native(&self) -> bool {
        true
    }

    /// Load the resource at `location`.
    async fn acquire(
        &self,
        location: &str,
        options: AcquireOptions,
    ) -> Result<Arc<dyn AudioResource>>;
}
