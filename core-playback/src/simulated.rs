//! # Simulated Audio Backend
//!
//! A silent [`AudioBackend`] whose resources advance a position on the
//! runtime clock. Hosts without native playback (browser shells, CI) run the
//! whole session against it, and the controller switches to it when a real
//! resource fails to load so the UI keeps behaving like a player.
//!
//! Time is read from [`core_async::time::Instant`], so tests using Tokio's
//! paused clock control playback progress exactly.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::playback::{
    clamp_volume, AcquireOptions, AudioBackend, AudioResource, ResourceId, ResourceStatus,
};
use core_async::time::Instant;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Backend handing out [`SimulatedResource`]s.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend;

impl SimulatedBackend {
    pub fn new() -> Self {
        Self
    }

    /// Create a resource directly, without going through the trait object.
    pub fn create(&self, options: AcquireOptions) -> Arc<SimulatedResource> {
        Arc::new(SimulatedResource::new(options))
    }
}

#[async_trait]
impl AudioBackend for SimulatedBackend {
    fn name(&self) -> &str {
        "simulated"
    }

    fn is_native(&self) -> bool {
        false
    }

    async fn acquire(
        &self,
        _location: &str,
        options: AcquireOptions,
    ) -> Result<Arc<dyn AudioResource>> {
        Ok(self.create(options))
    }
}

#[derive(Debug)]
struct ClockState {
    loaded: bool,
    /// Position at `started_at`, or the frozen position while paused.
    base: Duration,
    /// Set while the clock is running.
    started_at: Option<Instant>,
    finish_reported: bool,
    volume: f32,
}

/// Clock-driven audio resource.
///
/// Without an expected duration the stream never ends and reports no
/// duration.
#[derive(Debug)]
pub struct SimulatedResource {
    id: ResourceId,
    duration: Option<Duration>,
    state: Mutex<ClockState>,
}

impl SimulatedResource {
    pub fn new(options: AcquireOptions) -> Self {
        Self {
            id: ResourceId::new(),
            duration: options.expected_duration,
            state: Mutex::new(ClockState {
                loaded: true,
                base: Duration::ZERO,
                started_at: options.autoplay.then(Instant::now),
                finish_reported: false,
                volume: clamp_volume(options.initial_volume),
            }),
        }
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().started_at.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().loaded
    }

    /// Current position, capped at the expected duration.
    pub fn position(&self) -> Duration {
        self.position_of(&self.state.lock())
    }

    fn position_of(&self, state: &ClockState) -> Duration {
        let raw = match state.started_at {
            Some(started) => state.base + started.elapsed(),
            None => state.base,
        };
        self.cap(raw)
    }

    fn cap(&self, position: Duration) -> Duration {
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    fn at_end(&self, position: Duration) -> bool {
        self.duration.is_some_and(|duration| position >= duration)
    }

    fn with_loaded<R>(&self, f: impl FnOnce(&mut ClockState) -> R) -> Result<R> {
        let mut state = self.state.lock();
        if !state.loaded {
            return Err(BridgeError::ResourceUnloaded);
        }
        Ok(f(&mut state))
    }
}

#[async_trait]
impl AudioResource for SimulatedResource {
    fn id(&self) -> ResourceId {
        self.id
    }

    async fn play(&self) -> Result<()> {
        self.with_loaded(|state| {
            if state.started_at.is_some() {
                return;
            }
            if self.at_end(state.base) {
                state.base = Duration::ZERO;
            }
            state.finish_reported = false;
            state.started_at = Some(Instant::now());
        })
    }

    async fn pause(&self) -> Result<()> {
        self.with_loaded(|state| {
            state.base = self.position_of(state);
            state.started_at = None;
        })
    }

    async fn stop(&self) -> Result<()> {
        self.with_loaded(|state| {
            state.base = Duration::ZERO;
            state.started_at = None;
            state.finish_reported = false;
        })
    }

    async fn unload(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.loaded = false;
        state.started_at = None;
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        self.with_loaded(|state| {
            state.base = self.cap(position);
            state.finish_reported = false;
            if state.started_at.is_some() {
                state.started_at = Some(Instant::now());
            }
        })
    }

    async fn set_volume(&self, volume: f32) -> Result<()> {
        self.with_loaded(|state| state.volume = clamp_volume(volume))
    }

    async fn status(&self) -> Result<ResourceStatus> {
        self.with_loaded(|state| {
            let position = self.position_of(state);
            let mut status = ResourceStatus::loaded(position, self.duration);

            if state.started_at.is_some() && self.at_end(position) {
                // Stop the clock at the end; report completion once.
                state.base = position;
                state.started_at = None;
                if !state.finish_reported {
                    state.finish_reported = true;
                    status = status.finished();
                }
            }
            status
        })
    }
}
