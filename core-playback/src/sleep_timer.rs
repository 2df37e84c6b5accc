//! # Sleep Timer
//!
//! Stops playback after a chosen time, or when the current sound ends.
//!
//! The timer task only sleeps and then calls back; stopping the session is
//! the controller's job. Re-arming replaces the previous timer and any stop
//! of the session disarms it.

use core_async::sync::CancellationToken;
use core_async::time::{sleep, Instant};
use std::future::Future;
use std::time::Duration;

/// Durations offered by the sleep timer sheet, in minutes.
pub const SLEEP_TIMER_PRESETS_MINUTES: [u32; 5] = [5, 15, 30, 60, 120];

/// When an armed sleep timer stops playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepTimerMode {
    /// Stop after this much wall time.
    After(Duration),
    /// Stop when the current track finishes naturally.
    EndOfTrack,
}

impl SleepTimerMode {
    pub fn minutes(minutes: u32) -> Self {
        SleepTimerMode::After(Duration::from_secs(u64::from(minutes) * 60))
    }

    /// Preset options in display order, "end of current sound" last.
    pub fn presets() -> Vec<SleepTimerMode> {
        SLEEP_TIMER_PRESETS_MINUTES
            .iter()
            .map(|&m| SleepTimerMode::minutes(m))
            .chain(std::iter::once(SleepTimerMode::EndOfTrack))
            .collect()
    }

    /// Whole minutes for `After`, `None` for `EndOfTrack`.
    pub fn as_minutes(&self) -> Option<u32> {
        match self {
            SleepTimerMode::After(d) => Some((d.as_secs() / 60) as u32),
            SleepTimerMode::EndOfTrack => None,
        }
    }
}

/// An armed timer. Dropping it disarms.
#[derive(Debug)]
pub(crate) struct SleepTimerHandle {
    mode: SleepTimerMode,
    armed_at: Instant,
    token: CancellationToken,
}

impl SleepTimerHandle {
    /// Arm a timer. `After` timers spawn a task that runs `on_fire` unless
    /// cancelled first; `EndOfTrack` timers are checked by the controller on
    /// completion.
    pub(crate) fn arm<F, Fut>(mode: SleepTimerMode, on_fire: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();

        if let SleepTimerMode::After(delay) = mode {
            let task_token = token.clone();
            core_async::spawn(async move {
                core_async::select! {
                    _ = task_token.cancelled() => {}
                    _ = sleep(delay) => on_fire().await,
                }
            });
        }

        Self {
            mode,
            armed_at: Instant::now(),
            token,
        }
    }

    pub(crate) fn mode(&self) -> SleepTimerMode {
        self.mode
    }

    /// Time left for `After` timers.
    pub(crate) fn remaining(&self) -> Option<Duration> {
        match self.mode {
            SleepTimerMode::After(delay) => Some(delay.saturating_sub(self.armed_at.elapsed())),
            SleepTimerMode::EndOfTrack => None,
        }
    }

    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for SleepTimerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
