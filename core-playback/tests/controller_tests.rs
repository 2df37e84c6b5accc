//! Integration tests for the playback session controller.
//!
//! All tests run on Tokio's paused clock; the simulated resources and the
//! poller both read it, so progress values are exact.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::playback::{
    AcquireOptions, AudioBackend, AudioResource, ResourceId, ResourceStatus,
};
use core_catalog::Track;
use core_playback::{
    FallbackPolicy, PlaybackConfig, PlaybackController, PlaybackError, PlaybackMode,
    PlaybackStatus, SeekOffset, SimulatedResource, SleepTimerMode,
};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use mockall::mock;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};
use tokio::time::sleep;

// ============================================================================
// Fakes
// ============================================================================

/// Simulated resource that tracks whether it is still loaded.
struct CountedResource {
    inner: SimulatedResource,
    live: Arc<AtomicUsize>,
    unloaded: AtomicBool,
    fail_seek: AtomicBool,
}

impl CountedResource {
    fn volume(&self) -> f32 {
        self.inner.volume()
    }

    fn is_unloaded(&self) -> bool {
        self.unloaded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioResource for CountedResource {
    fn id(&self) -> ResourceId {
        self.inner.id()
    }

    async fn play(&self) -> BridgeResult<()> {
        self.inner.play().await
    }

    async fn pause(&self) -> BridgeResult<()> {
        self.inner.pause().await
    }

    async fn stop(&self) -> BridgeResult<()> {
        self.inner.stop().await
    }

    async fn unload(&self) -> BridgeResult<()> {
        if !self.unloaded.swap(true, Ordering::SeqCst) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
        self.inner.unload().await
    }

    async fn seek(&self, position: Duration) -> BridgeResult<()> {
        if self.fail_seek.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("seek rejected".into()));
        }
        self.inner.seek(position).await
    }

    async fn set_volume(&self, volume: f32) -> BridgeResult<()> {
        self.inner.set_volume(volume).await
    }

    async fn status(&self) -> BridgeResult<ResourceStatus> {
        self.inner.status().await
    }
}

/// Native-looking backend with gated acquisitions and failure injection.
#[derive(Default)]
struct FakeBackend {
    live: Arc<AtomicUsize>,
    acquired: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    resources: Mutex<Vec<Arc<CountedResource>>>,
}

impl FakeBackend {
    /// Hold acquisitions of `location` until the returned gate is notified.
    fn gate(&self, location: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .insert(location.to_string(), Arc::clone(&gate));
        gate
    }

    fn fail(&self, location: &str) {
        self.failing.lock().insert(location.to_string());
    }

    fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn acquisitions(&self) -> usize {
        self.acquired.lock().len()
    }

    fn resource(&self, index: usize) -> Arc<CountedResource> {
        Arc::clone(&self.resources.lock()[index])
    }
}

#[async_trait]
impl AudioBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn acquire(
        &self,
        location: &str,
        options: AcquireOptions,
    ) -> BridgeResult<Arc<dyn AudioResource>> {
        self.acquired.lock().push(location.to_string());

        let gate = self.gates.lock().get(location).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().contains(location) {
            return Err(BridgeError::UnsupportedMedia(location.to_string()));
        }

        self.live.fetch_add(1, Ordering::SeqCst);
        let resource = Arc::new(CountedResource {
            inner: SimulatedResource::new(options),
            live: Arc::clone(&self.live),
            unloaded: AtomicBool::new(false),
            fail_seek: AtomicBool::new(false),
        });
        self.resources.lock().push(Arc::clone(&resource));
        Ok(resource)
    }
}

mock! {
    pub Resource {}

    #[async_trait]
    impl AudioResource for Resource {
        fn id(&self) -> ResourceId;
        async fn play(&self) -> BridgeResult<()>;
        async fn pause(&self) -> BridgeResult<()>;
        async fn stop(&self) -> BridgeResult<()>;
        async fn unload(&self) -> BridgeResult<()>;
        async fn seek(&self, position: Duration) -> BridgeResult<()>;
        async fn set_volume(&self, volume: f32) -> BridgeResult<()>;
        async fn status(&self) -> BridgeResult<ResourceStatus>;
    }
}

/// Backend handing out one prepared resource.
struct SingleResourceBackend(Mutex<Option<Arc<dyn AudioResource>>>);

impl SingleResourceBackend {
    fn new(resource: MockResource) -> Self {
        Self(Mutex::new(Some(Arc::new(resource))))
    }
}

#[async_trait]
impl AudioBackend for SingleResourceBackend {
    fn name(&self) -> &str {
        "single"
    }

    async fn acquire(
        &self,
        _location: &str,
        _options: AcquireOptions,
    ) -> BridgeResult<Arc<dyn AudioResource>> {
        self.0
            .lock()
            .take()
            .ok_or_else(|| BridgeError::OperationFailed("already acquired".into()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn track(id: &str, secs: u32) -> Track {
    Track::new(
        id,
        format!("Sound {}", id),
        "Nature",
        format!("https://cdn.example.com/sounds/{}.mp3", id),
        secs,
    )
}

struct Harness {
    controller: PlaybackController,
    backend: Arc<FakeBackend>,
    events: broadcast::Receiver<CoreEvent>,
}

fn harness_with(config: PlaybackConfig) -> Harness {
    let backend = Arc::new(FakeBackend::default());
    let bus = EventBus::new(512);
    let events = bus.subscribe();
    let controller =
        PlaybackController::new(backend.clone(), config, Some(bus)).expect("valid config");
    Harness {
        controller,
        backend,
        events,
    }
}

fn harness() -> Harness {
    harness_with(PlaybackConfig::default())
}

fn playback_events(rx: &mut broadcast::Receiver<CoreEvent>) -> Vec<PlaybackEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let CoreEvent::Playback(event) = event {
            events.push(event);
        }
    }
    events
}

fn without_progress(events: Vec<PlaybackEvent>) -> Vec<PlaybackEvent> {
    events
        .into_iter()
        .filter(|event| !matches!(event, PlaybackEvent::PositionChanged { .. }))
        .collect()
}

async fn settle() {
    sleep(Duration::from_millis(10)).await;
}

// ============================================================================
// Loading and switching
// ============================================================================

#[tokio::test(start_paused = true)]
async fn play_track_loads_and_polls_progress() {
    let Harness {
        controller,
        backend,
        mut events,
    } = harness();

    controller.play_track(track("rain", 10)).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(snapshot.mode, Some(PlaybackMode::Native));
    assert_eq!(snapshot.duration, Duration::from_secs(10));
    assert_eq!(snapshot.progress, Duration::ZERO);
    assert_eq!(backend.live(), 1);

    sleep(Duration::from_millis(3500)).await;
    assert_eq!(controller.snapshot().progress, Duration::from_secs(3));

    let events = playback_events(&mut events);
    assert!(matches!(&events[0], PlaybackEvent::Loading { track_id } if track_id == "rain"));
    assert!(matches!(
        &events[1],
        PlaybackEvent::Started { simulated: false, .. }
    ));
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::PositionChanged { position_ms: 3000, .. })));
}

#[tokio::test(start_paused = true)]
async fn playing_same_track_again_is_noop() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();
    let rain = track("rain", 60);

    controller.play_track(rain.clone()).await;
    sleep(Duration::from_millis(2500)).await;
    controller.play_track(rain).await;

    assert_eq!(backend.acquisitions(), 1);
    assert!(controller.snapshot().is_playing());
    assert_eq!(controller.snapshot().progress, Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn switching_tracks_releases_previous_resource() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();

    controller.play_track(track("rain", 60)).await;
    sleep(Duration::from_secs(5)).await;
    controller.play_track(track("waves", 90)).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.current_track_id().map(|id| id.as_str()), Some("waves"));
    assert_eq!(snapshot.progress, Duration::ZERO);
    assert_eq!(snapshot.duration, Duration::from_secs(90));
    assert!(backend.resource(0).is_unloaded());
    assert_eq!(backend.live(), 1);
}

#[tokio::test(start_paused = true)]
async fn overlapping_loads_keep_only_latest() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();
    let rain = track("rain", 60);
    let gate = backend.gate(&rain.audio_location);

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.play_track(rain).await })
    };
    settle().await;
    assert!(controller.snapshot().is_loading());

    controller.play_track(track("waves", 90)).await;
    gate.notify_one();
    first.await.unwrap();
    settle().await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.current_track_id().map(|id| id.as_str()), Some("waves"));
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(backend.acquisitions(), 2);
    assert_eq!(backend.live(), 1, "stale acquisition must be released");
}

#[tokio::test(start_paused = true)]
async fn stop_during_loading_settles_idle() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();
    let rain = track("rain", 60);
    let gate = backend.gate(&rain.audio_location);

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.play_track(rain).await })
    };
    settle().await;

    controller.stop_sound().await;
    gate.notify_one();
    pending.await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert!(snapshot.current_track.is_none());
    assert_eq!(backend.live(), 0);
}

// ============================================================================
// Fallback
// ============================================================================

#[tokio::test(start_paused = true)]
async fn acquire_failure_falls_back_to_simulated() {
    let Harness {
        controller,
        backend,
        mut events,
    } = harness();
    let broken = track("broken", 30);
    backend.fail(&broken.audio_location);

    controller.play_track(broken).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert!(snapshot.is_simulated());
    assert_eq!(snapshot.duration, Duration::from_secs(30));
    assert_eq!(backend.live(), 0);

    sleep(Duration::from_millis(500)).await;
    let mut samples = Vec::new();
    for _ in 0..3 {
        sleep(Duration::from_secs(1)).await;
        samples.push(controller.snapshot().progress);
    }
    assert!(
        samples.windows(2).all(|pair| pair[0] < pair[1]),
        "simulated progress should advance: {:?}",
        samples
    );
    assert!(samples[2] <= Duration::from_secs(3));

    let events = without_progress(playback_events(&mut events));
    assert!(matches!(
        &events[1],
        PlaybackEvent::Started { simulated: true, .. }
    ));
    assert!(matches!(
        &events[2],
        PlaybackEvent::FallbackEngaged { reason, .. } if reason.contains("Unsupported media")
    ));
}

#[tokio::test(start_paused = true)]
async fn acquire_failure_with_stop_policy_returns_idle() {
    let Harness {
        controller,
        backend,
        mut events,
    } = harness_with(PlaybackConfig::default().with_fallback_policy(FallbackPolicy::Stop));
    let broken = track("broken", 30);
    backend.fail(&broken.audio_location);

    controller.play_track(broken).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert!(snapshot.current_track.is_none());

    let events = playback_events(&mut events);
    assert!(matches!(
        events.last(),
        Some(PlaybackEvent::Error { recoverable: false, track_id: Some(id), .. }) if id == "broken"
    ));
}

// ============================================================================
// Pause, resume, completion
// ============================================================================

#[tokio::test(start_paused = true)]
async fn pause_then_play_same_track_resumes() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();
    let rain = track("rain", 60);

    controller.play_track(rain.clone()).await;
    sleep(Duration::from_millis(2500)).await;
    controller.pause_track().await;

    assert_eq!(controller.snapshot().status, PlaybackStatus::Paused);
    sleep(Duration::from_secs(5)).await;
    assert_eq!(controller.snapshot().progress, Duration::from_secs(2));

    controller.play_track(rain).await;
    assert!(controller.snapshot().is_playing());
    assert_eq!(backend.acquisitions(), 1, "resume reuses the loaded resource");

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(controller.snapshot().progress, Duration::from_millis(4500));
}

#[tokio::test(start_paused = true)]
async fn toggle_playback_flips_between_playing_and_paused() {
    let Harness { controller, .. } = harness();

    controller.toggle_playback().await;
    assert_eq!(controller.snapshot().status, PlaybackStatus::Idle);

    controller.play_track(track("rain", 60)).await;
    controller.toggle_playback().await;
    assert_eq!(controller.snapshot().status, PlaybackStatus::Paused);
    controller.toggle_playback().await;
    assert_eq!(controller.snapshot().status, PlaybackStatus::Playing);
}

#[tokio::test(start_paused = true)]
async fn pause_during_loading_commits_paused() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();
    let rain = track("rain", 60);
    let gate = backend.gate(&rain.audio_location);

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.play_track(rain).await })
    };
    settle().await;
    controller.pause_track().await;
    gate.notify_one();
    pending.await.unwrap();

    assert_eq!(controller.snapshot().status, PlaybackStatus::Paused);
    assert!(!backend.resource(0).inner.is_running());
}

#[tokio::test(start_paused = true)]
async fn play_after_pause_during_loading_commits_playing() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();
    let rain = track("rain", 60);
    let gate = backend.gate(&rain.audio_location);

    let pending = {
        let controller = controller.clone();
        let rain = rain.clone();
        tokio::spawn(async move { controller.play_track(rain).await })
    };
    settle().await;
    controller.pause_track().await;
    controller.play_track(rain).await;
    assert_eq!(controller.snapshot().status, PlaybackStatus::Loading);

    gate.notify_one();
    pending.await.unwrap();

    assert_eq!(controller.snapshot().status, PlaybackStatus::Playing);
    assert_eq!(backend.acquisitions(), 1);
    assert!(backend.resource(0).inner.is_running());
}

#[tokio::test(start_paused = true)]
async fn toggle_during_loading_keeps_last_intent() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();
    let rain = track("rain", 60);
    let gate = backend.gate(&rain.audio_location);

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.play_track(rain).await })
    };
    settle().await;
    controller.toggle_playback().await;
    controller.toggle_playback().await;
    gate.notify_one();
    pending.await.unwrap();
    assert_eq!(controller.snapshot().status, PlaybackStatus::Playing);

    let waves = track("waves", 60);
    let gate = backend.gate(&waves.audio_location);
    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.play_track(waves).await })
    };
    settle().await;
    controller.toggle_playback().await;
    gate.notify_one();
    pending.await.unwrap();
    assert_eq!(controller.snapshot().status, PlaybackStatus::Paused);
}

#[tokio::test(start_paused = true)]
async fn natural_completion_pauses_and_rewinds() {
    let Harness {
        controller,
        mut events,
        ..
    } = harness();
    let chime = track("chime", 3);

    controller.play_track(chime.clone()).await;
    sleep(Duration::from_millis(4500)).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Paused);
    assert_eq!(snapshot.progress, Duration::ZERO);
    assert!(playback_events(&mut events)
        .iter()
        .any(|e| matches!(e, PlaybackEvent::Completed { track_id } if track_id == "chime")));

    controller.play_track(chime).await;
    sleep(Duration::from_millis(1500)).await;
    assert!(controller.snapshot().is_playing());
    assert_eq!(controller.snapshot().progress, Duration::from_secs(1));
}

// ============================================================================
// Seek and volume
// ============================================================================

#[tokio::test(start_paused = true)]
async fn seek_clamps_to_duration() {
    let Harness { controller, .. } = harness();
    controller.play_track(track("rain", 10)).await;

    controller.seek_to(Duration::from_secs(4)).await;
    assert_eq!(controller.snapshot().progress, Duration::from_secs(4));

    controller.seek_to(Duration::from_secs(30)).await;
    assert_eq!(controller.snapshot().progress, Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn skip_moves_relative_to_progress() {
    let Harness { controller, .. } = harness();
    controller.play_track(track("rain", 120)).await;

    controller.skip_by(SeekOffset::Forward(Duration::from_secs(15))).await;
    assert_eq!(controller.snapshot().progress, Duration::from_secs(15));

    controller.skip_by(SeekOffset::Backward(Duration::from_secs(60))).await;
    assert_eq!(controller.snapshot().progress, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn seek_when_idle_is_ignored() {
    let Harness {
        controller,
        mut events,
        ..
    } = harness();

    controller.seek_to(Duration::from_secs(5)).await;

    assert_eq!(controller.snapshot().progress, Duration::ZERO);
    assert!(playback_events(&mut events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn seek_failure_pauses_session() {
    let Harness {
        controller,
        backend,
        mut events,
    } = harness();
    controller.play_track(track("rain", 60)).await;
    backend.resource(0).fail_seek.store(true, Ordering::SeqCst);

    controller.seek_to(Duration::from_secs(20)).await;

    assert_eq!(controller.snapshot().status, PlaybackStatus::Paused);
    assert!(!backend.resource(0).inner.is_running());
    assert!(matches!(
        playback_events(&mut events).last(),
        Some(PlaybackEvent::Error { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn volume_persists_across_tracks() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();

    controller.set_volume(0.3).await;
    controller.play_track(track("rain", 60)).await;
    assert_eq!(backend.resource(0).volume(), 0.3);

    controller.set_volume(1.7).await;
    assert_eq!(controller.snapshot().volume, 1.0);
    assert_eq!(backend.resource(0).volume(), 1.0);

    controller.set_volume(-2.0).await;
    controller.play_track(track("waves", 60)).await;
    assert_eq!(controller.snapshot().volume, 0.0);
    assert_eq!(backend.resource(1).volume(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn volume_set_during_loading_applies_on_commit() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();
    let rain = track("rain", 60);
    let gate = backend.gate(&rain.audio_location);

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.play_track(rain).await })
    };
    settle().await;
    controller.set_volume(0.2).await;
    gate.notify_one();
    pending.await.unwrap();

    assert_eq!(backend.resource(0).volume(), 0.2);
}

// ============================================================================
// Stop and shutdown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent() {
    let Harness {
        controller,
        backend,
        mut events,
    } = harness();

    controller.stop_sound().await;
    assert!(playback_events(&mut events).is_empty());

    controller.play_track(track("rain", 60)).await;
    controller.stop_sound().await;
    controller.stop_sound().await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert_eq!(snapshot.progress, Duration::ZERO);
    assert_eq!(snapshot.duration, Duration::ZERO);
    assert_eq!(backend.live(), 0);

    let stops = playback_events(&mut events)
        .into_iter()
        .filter(|e| matches!(e, PlaybackEvent::Stopped { .. }))
        .count();
    assert_eq!(stops, 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_releases_and_ignores_later_commands() {
    let Harness {
        controller,
        backend,
        mut events,
    } = harness();
    controller.play_track(track("rain", 60)).await;

    controller.shutdown().await;
    assert!(controller.is_shut_down());
    assert_eq!(backend.live(), 0);

    controller.play_track(track("waves", 60)).await;
    assert_eq!(controller.snapshot().status, PlaybackStatus::Idle);
    assert_eq!(backend.acquisitions(), 1);

    let volume = controller.snapshot().volume;
    let _ = playback_events(&mut events);
    controller.set_volume(0.1).await;
    assert_eq!(controller.snapshot().volume, volume);
    assert!(playback_events(&mut events).is_empty());
    assert!(matches!(
        controller.set_sleep_timer(SleepTimerMode::minutes(5)),
        Err(PlaybackError::ShutDown)
    ));
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_latest_snapshot() {
    let Harness { controller, .. } = harness();
    let mut session = controller.subscribe();
    assert_eq!(session.borrow().status, PlaybackStatus::Idle);

    controller.play_track(track("rain", 60)).await;

    assert!(session.has_changed().unwrap());
    let snapshot = session.borrow_and_update().clone();
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(snapshot.current_track_id().map(|id| id.as_str()), Some("rain"));
}

// ============================================================================
// Sleep timer
// ============================================================================

#[tokio::test(start_paused = true)]
async fn sleep_timer_stops_after_delay() {
    let Harness {
        controller,
        backend,
        mut events,
    } = harness();
    controller.play_track(track("rain", 600)).await;

    controller
        .set_sleep_timer(SleepTimerMode::minutes(1))
        .unwrap();
    assert_eq!(
        controller.snapshot().sleep_timer,
        Some(SleepTimerMode::minutes(1))
    );

    sleep(Duration::from_secs(30)).await;
    assert_eq!(
        controller.sleep_timer_remaining(),
        Some(Duration::from_secs(30))
    );

    sleep(Duration::from_secs(31)).await;
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert_eq!(snapshot.sleep_timer, None);
    assert_eq!(backend.live(), 0);

    let events = without_progress(playback_events(&mut events));
    let tail = &events[events.len() - 2..];
    assert!(matches!(
        &tail[0],
        PlaybackEvent::SleepTimerFired { track_id: Some(id) } if id == "rain"
    ));
    assert!(matches!(&tail[1], PlaybackEvent::Stopped { .. }));
}

#[tokio::test(start_paused = true)]
async fn sleep_timer_end_of_track_stops_on_completion() {
    let Harness {
        controller,
        backend,
        ..
    } = harness();
    controller.play_track(track("chime", 3)).await;
    controller.set_sleep_timer(SleepTimerMode::EndOfTrack).unwrap();
    assert_eq!(controller.sleep_timer_remaining(), None);

    sleep(Duration::from_secs(4)).await;

    assert_eq!(controller.snapshot().status, PlaybackStatus::Idle);
    assert_eq!(backend.live(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_sleep_timer_does_not_fire() {
    let Harness {
        controller,
        mut events,
        ..
    } = harness();
    controller.play_track(track("rain", 600)).await;

    controller
        .set_sleep_timer(SleepTimerMode::minutes(1))
        .unwrap();
    controller.cancel_sleep_timer();
    sleep(Duration::from_secs(120)).await;

    assert!(controller.snapshot().is_playing());
    let events = playback_events(&mut events);
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::SleepTimerCancelled)));
    assert!(!events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::SleepTimerFired { .. })));
}

#[tokio::test(start_paused = true)]
async fn rearming_replaces_previous_timer() {
    let Harness { controller, .. } = harness();
    controller.play_track(track("rain", 3600)).await;

    controller
        .set_sleep_timer(SleepTimerMode::minutes(1))
        .unwrap();
    controller
        .set_sleep_timer(SleepTimerMode::minutes(5))
        .unwrap();

    sleep(Duration::from_secs(90)).await;
    assert!(controller.snapshot().is_playing());

    sleep(Duration::from_secs(240)).await;
    assert_eq!(controller.snapshot().status, PlaybackStatus::Idle);
}

#[tokio::test]
async fn disabled_sleep_timer_is_rejected() {
    let Harness { controller, .. } =
        harness_with(PlaybackConfig::default().with_sleep_timer(false));

    assert!(matches!(
        controller.set_sleep_timer(SleepTimerMode::EndOfTrack),
        Err(PlaybackError::SleepTimerDisabled)
    ));
}

#[test]
#[should_panic]
fn timed_sleep_timer_requires_runtime() {
    let Harness { controller, .. } = harness();
    let _ = controller.set_sleep_timer(SleepTimerMode::minutes(5));
}

#[test]
fn invalid_config_is_rejected() {
    let config = PlaybackConfig::default().with_poll_interval(Duration::ZERO);
    let result = PlaybackController::new(Arc::new(FakeBackend::default()), config, None);
    assert!(matches!(result, Err(PlaybackError::InvalidConfig(_))));
}

// ============================================================================
// Resource failures
// ============================================================================

#[tokio::test(start_paused = true)]
async fn status_failure_pauses_session() {
    let mut resource = MockResource::new();
    resource.expect_id().return_const(ResourceId::new());
    let mut queries = 0;
    resource.expect_status().returning(move || {
        queries += 1;
        if queries == 1 {
            Ok(ResourceStatus::loaded(
                Duration::ZERO,
                Some(Duration::from_secs(45)),
            ))
        } else {
            Err(BridgeError::Network("stream dropped".into()))
        }
    });
    resource.expect_pause().times(1).returning(|| Ok(()));

    let bus = EventBus::new(16);
    let mut events = bus.subscribe();
    let controller = PlaybackController::new(
        Arc::new(SingleResourceBackend::new(resource)),
        PlaybackConfig::default(),
        Some(bus),
    )
    .unwrap();

    controller.play_track(track("rain", 60)).await;
    assert_eq!(controller.snapshot().duration, Duration::from_secs(45));

    sleep(Duration::from_millis(1500)).await;

    assert_eq!(controller.snapshot().status, PlaybackStatus::Paused);
    assert!(matches!(
        playback_events(&mut events).last(),
        Some(PlaybackEvent::Error { recoverable: true, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn resume_failure_stays_paused() {
    let mut resource = MockResource::new();
    resource.expect_id().return_const(ResourceId::new());
    resource.expect_status().returning(|| {
        Ok(ResourceStatus::loaded(
            Duration::ZERO,
            Some(Duration::from_secs(45)),
        ))
    });
    resource.expect_pause().returning(|| Ok(()));
    resource
        .expect_play()
        .times(1)
        .returning(|| Err(BridgeError::OperationFailed("audio session interrupted".into())));

    let controller = PlaybackController::new(
        Arc::new(SingleResourceBackend::new(resource)),
        PlaybackConfig::default(),
        None,
    )
    .unwrap();
    let rain = track("rain", 60);

    controller.play_track(rain.clone()).await;
    controller.pause_track().await;
    controller.play_track(rain).await;

    assert_eq!(controller.snapshot().status, PlaybackStatus::Paused);
}
