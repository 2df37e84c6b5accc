//! # Playback Session Controller
//!
//! Owns the single playback session: which track is current, the loaded
//! audio resource, progress, volume and the sleep timer.
//!
//! ## State machine
//!
//! ```text
//!            play_track(t)                 acquired
//!   Idle ─────────────────> Loading ─────────────────> Playing
//!    ^                        │   acquire failed         │  ^
//!    │ stop_sound             │   (Simulate policy) ─────┘  │ play_track(same)
//!    │ (from any state)       │                             │
//!    │                        └─ acquire failed (Stop) ─> Idle
//!    │                                                   pause_track / finished
//!    │                                                      v  │
//!    └──────────────────────────────────────────────────  Paused
//! ```
//!
//! ## Concurrency
//!
//! Session state sits behind a `parking_lot::Mutex` that is never held
//! across an `.await`; every backend call happens outside the lock. Loads are
//! numbered by a generation counter that every load and every stop bumps.
//! A resource acquired for an outdated generation is released instead of
//! committed, so overlapping `play_track` calls settle with one live handle.
//!
//! ## Failures
//!
//! Commands never return errors. Acquisition failures follow the configured
//! [`FallbackPolicy`]; failures on a loaded resource leave the session
//! paused. Both are logged and published as `PlaybackEvent::Error`.

use crate::config::{FallbackPolicy, PlaybackConfig};
use crate::error::{PlaybackError, Result};
use crate::poller::{spawn_poller, PollerHandle};
use crate::session::{PlaybackMode, PlaybackStatus, SessionSnapshot};
use crate::simulated::SimulatedBackend;
use crate::sleep_timer::{SleepTimerHandle, SleepTimerMode};
use bridge_traits::playback::{
    clamp_volume, AcquireOptions, AudioBackend, AudioResource, ResourceStatus,
};
use core_async::sync::watch;
use core_catalog::Track;
use core_runtime::events::{EventBus, PlaybackEvent};
use core_runtime::logging::redact_location;
use parking_lot::Mutex;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default step for the skip buttons.
pub const DEFAULT_SKIP: Duration = Duration::from_secs(15);

/// Relative seek used by [`PlaybackController::skip_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOffset {
    Forward(Duration),
    Backward(Duration),
}

/// Commands issued while a load is in flight, applied on commit.
#[derive(Debug, Default)]
struct PendingIntent {
    pause: bool,
    seek: Option<Duration>,
}

struct SessionState {
    snapshot: SessionSnapshot,
    resource: Option<Arc<dyn AudioResource>>,
    generation: u64,
    poller: Option<PollerHandle>,
    next_poller_seq: u64,
    sleep_timer: Option<SleepTimerHandle>,
    sleep_timer_seq: u64,
    pending: PendingIntent,
    shut_down: bool,
}

impl SessionState {
    fn owns_poller(&self, seq: u64, generation: u64) -> bool {
        self.generation == generation && self.poller.as_ref().map(PollerHandle::seq) == Some(seq)
    }

    fn track_id(&self) -> Option<String> {
        self.snapshot
            .current_track
            .as_ref()
            .map(|track| track.id.to_string())
    }

    fn position_ms(&self) -> u64 {
        self.snapshot.progress.as_millis() as u64
    }

    /// Forget the current track, keeping volume and the armed timer.
    fn clear_track(&mut self) {
        let volume = self.snapshot.volume;
        let sleep_timer = self.snapshot.sleep_timer;
        self.snapshot = SessionSnapshot::idle(volume);
        self.snapshot.sleep_timer = sleep_timer;
        self.pending = PendingIntent::default();
        self.poller = None;
    }
}

struct ControllerInner {
    backend: Arc<dyn AudioBackend>,
    fallback: SimulatedBackend,
    config: PlaybackConfig,
    state: Mutex<SessionState>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    events: Option<EventBus>,
}

impl ControllerInner {
    /// Mutate session state and publish the resulting snapshot if it changed.
    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.state.lock();
        let result = f(&mut state);
        self.snapshot_tx.send_if_modified(|published| {
            if *published == state.snapshot {
                false
            } else {
                *published = state.snapshot.clone();
                true
            }
        });
        result
    }

    fn is_current(&self, generation: u64) -> bool {
        let state = self.state.lock();
        state.generation == generation && !state.shut_down
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(events) = &self.events {
            events.emit_playback(event);
        }
    }

    fn emit_error(&self, track_id: Option<String>, err: &PlaybackError) {
        self.emit(PlaybackEvent::Error {
            track_id,
            message: err.to_string(),
            recoverable: err.is_transient(),
        });
    }
}

enum PlayPlan {
    Ignore,
    Resume {
        resource: Arc<dyn AudioResource>,
        generation: u64,
        position_ms: u64,
    },
    Load {
        previous: Option<Arc<dyn AudioResource>>,
        generation: u64,
        volume: f32,
    },
}

enum TickOutcome {
    Stale,
    Progress {
        track_id: String,
        position: Duration,
        duration: Duration,
    },
    Finished {
        track_id: String,
        stop_for_timer: bool,
    },
    Unloaded {
        track_id: Option<String>,
    },
}

struct Commit {
    volume: f32,
    seek: Option<Duration>,
    paused: bool,
}

/// Controller of the process-wide playback session.
///
/// Cheap to clone; clones drive the same session.
#[derive(Clone)]
pub struct PlaybackController {
    inner: Arc<ControllerInner>,
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("backend", &self.inner.backend.name())
            .field("config", &self.inner.config)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl PlaybackController {
    /// Create a controller over `backend`.
    ///
    /// # Errors
    /// [`PlaybackError::InvalidConfig`] when `config` fails validation.
    pub fn new(
        backend: Arc<dyn AudioBackend>,
        config: PlaybackConfig,
        events: Option<EventBus>,
    ) -> Result<Self> {
        config.validate().map_err(PlaybackError::InvalidConfig)?;

        let snapshot = SessionSnapshot::idle(clamp_volume(config.initial_volume));
        let (snapshot_tx, _) = watch::channel(snapshot.clone());

        info!(
            backend = backend.name(),
            native = backend.is_native(),
            "Playback controller created"
        );

        Ok(Self {
            inner: Arc::new(ControllerInner {
                backend,
                fallback: SimulatedBackend::new(),
                config,
                state: Mutex::new(SessionState {
                    snapshot,
                    resource: None,
                    generation: 0,
                    poller: None,
                    next_poller_seq: 0,
                    sleep_timer: None,
                    sleep_timer_seq: 0,
                    pending: PendingIntent::default(),
                    shut_down: false,
                }),
                snapshot_tx,
                events,
            }),
        })
    }

    /// Current session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.lock().snapshot.clone()
    }

    /// Subscribe to session snapshots. The receiver starts at the current
    /// state.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    pub fn backend_name(&self) -> &str {
        self.inner.backend.name()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Play `track`.
    ///
    /// No-op when `track` is current and playing. When it is current and
    /// loading, a pause requested during the load is dropped. Resumes when it
    /// is current and paused; otherwise releases any loaded resource and
    /// loads `track`.
    #[instrument(skip(self, track), fields(track_id = %track.id))]
    pub async fn play_track(&self, track: Track) {
        let plan = self.inner.update(|s| {
            if s.shut_down {
                return PlayPlan::Ignore;
            }

            let is_current = s
                .snapshot
                .current_track
                .as_ref()
                .is_some_and(|current| current.id == track.id);

            if is_current {
                match s.snapshot.status {
                    PlaybackStatus::Playing => return PlayPlan::Ignore,
                    PlaybackStatus::Loading => {
                        s.pending.pause = false;
                        return PlayPlan::Ignore;
                    }
                    PlaybackStatus::Paused => {
                        if let Some(resource) = s.resource.clone() {
                            let generation = s.generation;
                            s.snapshot.status = PlaybackStatus::Playing;
                            self.start_poller(s, generation, Arc::clone(&resource));
                            return PlayPlan::Resume {
                                resource,
                                generation,
                                position_ms: s.position_ms(),
                            };
                        }
                    }
                    PlaybackStatus::Idle => {}
                }
            }

            s.generation += 1;
            s.poller = None;
            s.pending = PendingIntent::default();
            let previous = s.resource.take();
            s.snapshot.current_track = Some(track.clone());
            s.snapshot.status = PlaybackStatus::Loading;
            s.snapshot.progress = Duration::ZERO;
            s.snapshot.duration = track.duration();
            s.snapshot.mode = None;

            PlayPlan::Load {
                previous,
                generation: s.generation,
                volume: s.snapshot.volume,
            }
        });

        match plan {
            PlayPlan::Ignore => debug!("Track already current, nothing to do"),
            PlayPlan::Resume {
                resource,
                generation,
                position_ms,
            } => self.resume(track, resource, generation, position_ms).await,
            PlayPlan::Load {
                previous,
                generation,
                volume,
            } => self.load(track, previous, generation, volume).await,
        }
    }

    /// Pause playback. No-op when idle or paused; while loading, the track
    /// comes up paused.
    pub async fn pause_track(&self) {
        let target = self.inner.update(|s| match s.snapshot.status {
            PlaybackStatus::Playing => {
                s.snapshot.status = PlaybackStatus::Paused;
                s.poller = None;
                s.resource
                    .clone()
                    .map(|resource| (resource, s.track_id(), s.position_ms()))
            }
            PlaybackStatus::Loading => {
                s.pending.pause = true;
                None
            }
            PlaybackStatus::Idle | PlaybackStatus::Paused => None,
        });

        let Some((resource, track_id, position_ms)) = target else {
            return;
        };

        if let Err(err) = resource.pause().await {
            let err = PlaybackError::resource(err);
            warn!(error = %err, "Pause failed, session stays paused");
            self.inner.emit_error(track_id.clone(), &err);
        }

        if let Some(track_id) = track_id {
            self.inner.emit(PlaybackEvent::Paused {
                track_id,
                position_ms,
            });
        }
    }

    /// Pause when playing, otherwise resume the current track. While loading
    /// it flips whether the track comes up paused.
    pub async fn toggle_playback(&self) {
        let flipped = self.inner.update(|s| {
            if s.shut_down || s.snapshot.status != PlaybackStatus::Loading {
                return false;
            }
            s.pending.pause = !s.pending.pause;
            true
        });
        if flipped {
            return;
        }

        let snapshot = self.snapshot();
        match snapshot.status {
            PlaybackStatus::Playing => self.pause_track().await,
            PlaybackStatus::Loading => {}
            PlaybackStatus::Paused => {
                if let Some(track) = snapshot.current_track {
                    self.play_track(track).await;
                }
            }
            PlaybackStatus::Idle => {}
        }
    }

    /// Stop playback, release the resource and forget the current track.
    ///
    /// Always safe to call. Disarms the sleep timer.
    pub async fn stop_sound(&self) {
        let (resource, track_id, had_timer) = self.inner.update(|s| {
            s.generation += 1;
            let track_id = s.track_id();
            let had_timer = s.sleep_timer.take().is_some();
            s.clear_track();
            s.snapshot.sleep_timer = None;
            (s.resource.take(), track_id, had_timer)
        });

        if had_timer {
            debug!("Sleep timer disarmed by stop");
        }

        let released = resource.is_some();
        if let Some(resource) = resource {
            self.release(resource).await;
        }

        if released || track_id.is_some() {
            info!(track_id = ?track_id, "Playback stopped");
            self.inner.emit(PlaybackEvent::Stopped { track_id });
        }
    }

    /// Move to `position`, clamped to the session duration.
    ///
    /// Progress updates immediately. A failed seek pauses the session.
    pub async fn seek_to(&self, position: Duration) {
        let target = self.inner.update(|s| {
            let clamped = position.min(s.snapshot.duration);
            match s.snapshot.status {
                PlaybackStatus::Idle => None,
                PlaybackStatus::Loading => {
                    s.pending.seek = Some(clamped);
                    s.snapshot.progress = clamped;
                    None
                }
                PlaybackStatus::Paused | PlaybackStatus::Playing => {
                    s.snapshot.progress = clamped;
                    s.resource.clone().map(|resource| {
                        (
                            resource,
                            clamped,
                            s.generation,
                            s.track_id(),
                            s.snapshot.duration,
                        )
                    })
                }
            }
        });

        let Some((resource, position, generation, track_id, duration)) = target else {
            return;
        };

        match resource.seek(position).await {
            Ok(()) => {
                if let Some(track_id) = track_id {
                    self.inner.emit(PlaybackEvent::PositionChanged {
                        track_id,
                        position_ms: position.as_millis() as u64,
                        duration_ms: duration.as_millis() as u64,
                    });
                }
            }
            Err(err) => {
                let err = PlaybackError::resource(err);
                warn!(error = %err, "Seek failed, pausing");
                self.pause_after_error(generation, &resource).await;
                self.inner.emit_error(track_id, &err);
            }
        }
    }

    /// Seek relative to the current progress.
    pub async fn skip_by(&self, offset: SeekOffset) {
        let progress = self.snapshot().progress;
        let target = match offset {
            SeekOffset::Forward(by) => progress.saturating_add(by),
            SeekOffset::Backward(by) => progress.saturating_sub(by),
        };
        self.seek_to(target).await;
    }

    /// Set the session volume, clamped to `0.0..=1.0`.
    ///
    /// Applies to the loaded resource when there is one and to every later
    /// load.
    pub async fn set_volume(&self, level: f32) {
        let level = clamp_volume(level);
        let Some(resource) = self.inner.update(|s| {
            if s.shut_down {
                return None;
            }
            s.snapshot.volume = level;
            Some(s.resource.clone())
        }) else {
            debug!("Controller shut down, volume change ignored");
            return;
        };

        self.inner.emit(PlaybackEvent::VolumeChanged {
            volume_percent: (level * 100.0).round() as u8,
        });

        if let Some(resource) = resource {
            if let Err(err) = resource.set_volume(level).await {
                warn!(error = %err, "Failed to apply volume to resource");
            }
        }
    }

    // ========================================================================
    // Sleep timer
    // ========================================================================

    /// Arm the sleep timer, replacing any armed timer.
    ///
    /// # Errors
    /// [`PlaybackError::SleepTimerDisabled`] when disabled by configuration,
    /// [`PlaybackError::ShutDown`] after [`shutdown`](Self::shutdown).
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, since timed modes spawn
    /// their countdown task on the current runtime.
    pub fn set_sleep_timer(&self, mode: SleepTimerMode) -> Result<()> {
        if !self.inner.config.enable_sleep_timer {
            return Err(PlaybackError::SleepTimerDisabled);
        }

        let weak = Arc::downgrade(&self.inner);
        self.inner.update(|s| {
            if s.shut_down {
                return Err(PlaybackError::ShutDown);
            }
            s.sleep_timer_seq += 1;
            let seq = s.sleep_timer_seq;
            s.sleep_timer = Some(SleepTimerHandle::arm(mode, move || async move {
                if let Some(controller) = Self::upgrade(&weak) {
                    controller.on_sleep_timer(seq).await;
                }
            }));
            s.snapshot.sleep_timer = Some(mode);
            Ok(())
        })?;

        info!(mode = ?mode, "Sleep timer armed");
        self.inner.emit(PlaybackEvent::SleepTimerArmed {
            minutes: mode.as_minutes(),
        });
        Ok(())
    }

    /// Disarm the sleep timer.
    pub fn cancel_sleep_timer(&self) {
        let cancelled = self.inner.update(|s| {
            s.snapshot.sleep_timer = None;
            s.sleep_timer.take()
        });

        if let Some(timer) = cancelled {
            timer.cancel();
            debug!("Sleep timer cancelled");
            self.inner.emit(PlaybackEvent::SleepTimerCancelled);
        }
    }

    /// Time left on an armed `After` timer.
    pub fn sleep_timer_remaining(&self) -> Option<Duration> {
        self.inner
            .state
            .lock()
            .sleep_timer
            .as_ref()
            .and_then(SleepTimerHandle::remaining)
    }

    async fn on_sleep_timer(&self, seq: u64) {
        let armed = {
            let state = self.inner.state.lock();
            state.sleep_timer_seq == seq && state.sleep_timer.is_some()
        };
        if armed {
            self.fire_sleep_timer().await;
        }
    }

    async fn fire_sleep_timer(&self) {
        let track_id = self.inner.state.lock().track_id();
        info!(track_id = ?track_id, "Sleep timer fired");
        self.inner
            .emit(PlaybackEvent::SleepTimerFired { track_id });
        self.stop_sound().await;
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Release the session for good. Later commands are ignored.
    pub async fn shutdown(&self) {
        let already = self.inner.update(|s| std::mem::replace(&mut s.shut_down, true));
        if already {
            return;
        }
        self.stop_sound().await;
        info!("Playback controller shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.state.lock().shut_down
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn upgrade(weak: &Weak<ControllerInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    async fn resume(
        &self,
        track: Track,
        resource: Arc<dyn AudioResource>,
        generation: u64,
        position_ms: u64,
    ) {
        let track_id = track.id.to_string();
        match resource.play().await {
            Ok(()) => {
                debug!("Resumed");
                self.inner.emit(PlaybackEvent::Resumed {
                    track_id,
                    position_ms,
                });
            }
            Err(err) => {
                let err = PlaybackError::resource(err);
                warn!(error = %err, "Resume failed, staying paused");
                self.inner.update(|s| {
                    if s.generation == generation && s.snapshot.status == PlaybackStatus::Playing {
                        s.snapshot.status = PlaybackStatus::Paused;
                        s.poller = None;
                    }
                });
                self.inner.emit_error(Some(track_id), &err);
            }
        }
    }

    async fn load(
        &self,
        track: Track,
        previous: Option<Arc<dyn AudioResource>>,
        generation: u64,
        volume: f32,
    ) {
        let track_id = track.id.to_string();
        info!(
            generation,
            location = %redact_location(&track.audio_location),
            "Loading track"
        );
        self.inner.emit(PlaybackEvent::Loading {
            track_id: track_id.clone(),
        });

        if let Some(previous) = previous {
            self.release(previous).await;
        }
        if !self.inner.is_current(generation) {
            debug!(generation, "Load superseded before acquisition");
            return;
        }

        let options = AcquireOptions::default()
            .with_autoplay(true)
            .with_volume(volume)
            .with_expected_duration(track.duration());

        let backend = &self.inner.backend;
        let (resource, mode, fallback_reason) =
            match backend.acquire(&track.audio_location, options).await {
                Ok(resource) => {
                    let mode = if backend.is_native() {
                        PlaybackMode::Native
                    } else {
                        PlaybackMode::Simulated
                    };
                    (resource, mode, None)
                }
                Err(err) => {
                    let err = PlaybackError::acquire(err);
                    match self.inner.config.fallback_policy {
                        FallbackPolicy::Simulate => {
                            warn!(
                                error = %err,
                                platform_limitation = err.is_platform_limitation(),
                                "Acquisition failed, playing simulated"
                            );
                            let resource: Arc<dyn AudioResource> =
                                self.inner.fallback.create(options);
                            (resource, PlaybackMode::Simulated, Some(err))
                        }
                        FallbackPolicy::Stop => {
                            self.abandon_load(generation, track_id, err);
                            return;
                        }
                    }
                }
            };

        if !self.inner.is_current(generation) {
            debug!(generation, "Load superseded during acquisition");
            self.release(resource).await;
            return;
        }

        let reported = match resource.status().await {
            Ok(status) => status.known_duration(),
            Err(err) => {
                debug!(error = %err, "Status unavailable after load");
                None
            }
        };
        let duration = reported.unwrap_or_else(|| track.duration());

        let commit = self.inner.update(|s| {
            if s.generation != generation || s.shut_down {
                return None;
            }

            let pending = std::mem::take(&mut s.pending);
            let progress = pending.seek.map_or(Duration::ZERO, |p| p.min(duration));

            s.resource = Some(Arc::clone(&resource));
            s.snapshot.duration = duration;
            s.snapshot.progress = progress;
            s.snapshot.mode = Some(mode);
            if pending.pause {
                s.snapshot.status = PlaybackStatus::Paused;
            } else {
                s.snapshot.status = PlaybackStatus::Playing;
                self.start_poller(s, generation, Arc::clone(&resource));
            }

            Some(Commit {
                volume: s.snapshot.volume,
                seek: pending.seek.map(|_| progress),
                paused: pending.pause,
            })
        });

        let Some(commit) = commit else {
            debug!(generation, "Load superseded before commit");
            self.release(resource).await;
            return;
        };

        if commit.volume != volume {
            if let Err(err) = resource.set_volume(commit.volume).await {
                debug!(error = %err, "Failed to apply volume changed during load");
            }
        }
        if let Some(position) = commit.seek {
            if let Err(err) = resource.seek(position).await {
                debug!(error = %err, "Failed to apply seek requested during load");
            }
        }
        if commit.paused {
            if let Err(err) = resource.pause().await {
                debug!(error = %err, "Failed to pause after load");
            }
        }

        let simulated = mode == PlaybackMode::Simulated;
        info!(
            generation,
            simulated,
            duration_secs = duration.as_secs(),
            "Playback started"
        );
        self.inner.emit(PlaybackEvent::Started {
            track_id: track_id.clone(),
            title: track.title.clone(),
            simulated,
        });
        if let Some(err) = fallback_reason {
            self.inner.emit(PlaybackEvent::FallbackEngaged {
                track_id: track_id.clone(),
                reason: err.to_string(),
            });
        }
        if commit.paused {
            self.inner.emit(PlaybackEvent::Paused {
                track_id,
                position_ms: commit.seek.unwrap_or_default().as_millis() as u64,
            });
        }
    }

    fn abandon_load(&self, generation: u64, track_id: String, err: PlaybackError) {
        let abandoned = self.inner.update(|s| {
            if s.generation != generation {
                return false;
            }
            s.clear_track();
            true
        });

        if abandoned {
            warn!(error = %err, "Acquisition failed, returning to idle");
            self.inner.emit_error(Some(track_id), &err);
        }
    }

    /// Stop and unload a resource that is no longer part of the session.
    async fn release(&self, resource: Arc<dyn AudioResource>) {
        let id = resource.id();
        if let Err(err) = resource.stop().await {
            debug!(resource = %id, error = %err, "Stop before unload failed");
        }
        if let Err(err) = resource.unload().await {
            warn!(resource = %id, error = %err, "Failed to unload resource");
        }
    }

    async fn pause_after_error(&self, generation: u64, resource: &Arc<dyn AudioResource>) {
        let paused = self.inner.update(|s| {
            if s.generation == generation && s.snapshot.status == PlaybackStatus::Playing {
                s.snapshot.status = PlaybackStatus::Paused;
                s.poller = None;
                true
            } else {
                false
            }
        });

        if paused {
            if let Err(err) = resource.pause().await {
                debug!(error = %err, "Pause after error failed");
            }
        }
    }

    fn start_poller(
        &self,
        state: &mut SessionState,
        generation: u64,
        resource: Arc<dyn AudioResource>,
    ) {
        state.next_poller_seq += 1;
        let weak = Arc::downgrade(&self.inner);

        // Replacing the handle cancels the previous loop.
        state.poller = Some(spawn_poller(
            state.next_poller_seq,
            self.inner.config.poll_interval,
            move |seq| {
                let weak = weak.clone();
                let resource = Arc::clone(&resource);
                async move {
                    match Self::upgrade(&weak) {
                        Some(controller) => controller.poll_tick(seq, generation, resource).await,
                        None => ControlFlow::Break(()),
                    }
                }
            },
        ));
    }

    async fn poll_tick(
        &self,
        seq: u64,
        generation: u64,
        resource: Arc<dyn AudioResource>,
    ) -> ControlFlow<()> {
        let owns_poller = self.inner.state.lock().owns_poller(seq, generation);
        if !owns_poller {
            return ControlFlow::Break(());
        }

        match resource.status().await {
            Ok(status) => self.apply_status(seq, generation, &resource, status).await,
            Err(err) => {
                let err = PlaybackError::resource(err);
                let track_id = self.inner.update(|s| {
                    if s.owns_poller(seq, generation)
                        && s.snapshot.status == PlaybackStatus::Playing
                    {
                        s.snapshot.status = PlaybackStatus::Paused;
                        s.poller = None;
                        Some(s.track_id())
                    } else {
                        None
                    }
                });

                if let Some(track_id) = track_id {
                    warn!(error = %err, "Status query failed, pausing");
                    if let Err(pause_err) = resource.pause().await {
                        debug!(error = %pause_err, "Pause after status failure failed");
                    }
                    self.inner.emit_error(track_id, &err);
                }
                ControlFlow::Break(())
            }
        }
    }

    async fn apply_status(
        &self,
        seq: u64,
        generation: u64,
        resource: &Arc<dyn AudioResource>,
        status: ResourceStatus,
    ) -> ControlFlow<()> {
        let outcome = self.inner.update(|s| {
            if !s.owns_poller(seq, generation) || s.snapshot.status != PlaybackStatus::Playing {
                return TickOutcome::Stale;
            }
            let track_id = s.track_id().unwrap_or_default();

            if status.did_just_finish {
                s.snapshot.status = PlaybackStatus::Paused;
                s.snapshot.progress = Duration::ZERO;
                s.poller = None;
                let stop_for_timer = s.sleep_timer.as_ref().map(SleepTimerHandle::mode)
                    == Some(SleepTimerMode::EndOfTrack);
                return TickOutcome::Finished {
                    track_id,
                    stop_for_timer,
                };
            }

            if !status.is_loaded {
                s.snapshot.status = PlaybackStatus::Paused;
                s.poller = None;
                return TickOutcome::Unloaded {
                    track_id: Some(track_id),
                };
            }

            if let Some(duration) = status.known_duration() {
                s.snapshot.duration = duration;
            }
            s.snapshot.progress = status.position.min(s.snapshot.duration);
            TickOutcome::Progress {
                track_id,
                position: s.snapshot.progress,
                duration: s.snapshot.duration,
            }
        });

        match outcome {
            TickOutcome::Stale => ControlFlow::Break(()),
            TickOutcome::Progress {
                track_id,
                position,
                duration,
            } => {
                self.inner.emit(PlaybackEvent::PositionChanged {
                    track_id,
                    position_ms: position.as_millis() as u64,
                    duration_ms: duration.as_millis() as u64,
                });
                ControlFlow::Continue(())
            }
            TickOutcome::Finished {
                track_id,
                stop_for_timer,
            } => {
                info!(track_id = %track_id, "Track finished");
                self.inner.emit(PlaybackEvent::Completed { track_id });
                if stop_for_timer {
                    self.fire_sleep_timer().await;
                } else if let Err(err) = resource.seek(Duration::ZERO).await {
                    debug!(error = %err, "Rewind after completion failed");
                }
                ControlFlow::Break(())
            }
            TickOutcome::Unloaded { track_id } => {
                let err = PlaybackError::ResourceUnloaded;
                warn!(error = %err, "Resource unloaded underneath session, pausing");
                self.inner.emit_error(track_id, &err);
                ControlFlow::Break(())
            }
        }
    }
}
