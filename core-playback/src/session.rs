//! # Playback Session
//!
//! The observable state of the single playback session.
//!
//! Observers receive immutable [`SessionSnapshot`]s through a `watch`
//! channel. Loading and playing are two values of one [`PlaybackStatus`], so
//! a snapshot can never claim both at once.

use core_catalog::{Track, TrackId};
use std::time::Duration;

use crate::sleep_timer::SleepTimerMode;

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Nothing loaded.
    #[default]
    Idle,
    /// A resource is being acquired for `current_track`.
    Loading,
    /// Resource loaded, not producing audio.
    Paused,
    /// Resource loaded and producing audio (or the simulated clock running).
    Playing,
}

impl PlaybackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackStatus::Idle => "idle",
            PlaybackStatus::Loading => "loading",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Playing => "playing",
        }
    }
}

/// How the committed resource produces sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Platform audio engine.
    Native,
    /// Clock-driven, silent.
    Simulated,
}

/// Immutable view of the session published to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub current_track: Option<Track>,
    pub status: PlaybackStatus,
    /// Position, kept within `0..=duration`.
    pub progress: Duration,
    /// Length reported by the resource, else the track's declared length.
    pub duration: Duration,
    /// `0.0..=1.0`, persists across track changes.
    pub volume: f32,
    /// `None` until a resource is committed.
    pub mode: Option<PlaybackMode>,
    pub sleep_timer: Option<SleepTimerMode>,
}

impl SessionSnapshot {
    pub(crate) fn idle(volume: f32) -> Self {
        Self {
            current_track: None,
            status: PlaybackStatus::Idle,
            progress: Duration::ZERO,
            duration: Duration::ZERO,
            volume,
            mode: None,
            sleep_timer: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn is_loading(&self) -> bool {
        self.status == PlaybackStatus::Loading
    }

    pub fn is_simulated(&self) -> bool {
        self.mode == Some(PlaybackMode::Simulated)
    }

    pub fn current_track_id(&self) -> Option<&TrackId> {
        self.current_track.as_ref().map(|track| &track.id)
    }

    /// Progress as a fraction of the duration, `0.0` when the duration is
    /// unknown. Drives the mini-player progress bar.
    pub fn progress_fraction(&self) -> f32 {
        if self.duration.is_zero() {
            0.0
        } else {
            (self.progress.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
        }
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::idle(1.0)
    }
}
