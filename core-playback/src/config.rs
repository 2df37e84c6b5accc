//! # Playback Configuration
//!
//! Tunables of the playback session controller.

use core_runtime::config::{CoreConfig, MAX_POLL_INTERVAL, MIN_POLL_INTERVAL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do when the audio backend cannot load a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Keep the session "playing" on a clock-driven simulated resource.
    #[default]
    Simulate,
    /// Return to idle and report the error.
    Stop,
}

/// Playback controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How often the position is polled while playing.
    ///
    /// Default: 1 second.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// Session volume before the user changes it.
    ///
    /// Default: 1.0.
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    /// Behavior on acquisition failure.
    ///
    /// Default: [`FallbackPolicy::Simulate`].
    #[serde(default)]
    pub fallback_policy: FallbackPolicy,

    /// Whether `set_sleep_timer` is accepted.
    ///
    /// Default: true.
    #[serde(default = "default_enable_sleep_timer")]
    pub enable_sleep_timer: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            initial_volume: default_initial_volume(),
            fallback_policy: FallbackPolicy::default(),
            enable_sleep_timer: default_enable_sleep_timer(),
        }
    }
}

impl PlaybackConfig {
    /// Derive the playback settings from the core configuration.
    pub fn from_core(config: &CoreConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            initial_volume: config.initial_volume,
            fallback_policy: if config.features.simulate_on_acquire_failure {
                FallbackPolicy::Simulate
            } else {
                FallbackPolicy::Stop
            },
            enable_sleep_timer: config.features.enable_sleep_timer,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume;
        self
    }

    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = policy;
        self
    }

    pub fn with_sleep_timer(mut self, enabled: bool) -> Self {
        self.enable_sleep_timer = enabled;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval < MIN_POLL_INTERVAL || self.poll_interval > MAX_POLL_INTERVAL {
            return Err(format!(
                "poll_interval must be between {:?} and {:?}",
                MIN_POLL_INTERVAL, MAX_POLL_INTERVAL
            ));
        }

        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err("initial_volume must be between 0.0 and 1.0".to_string());
        }

        Ok(())
    }
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_initial_volume() -> f32 {
    1.0
}

fn default_enable_sleep_timer() -> bool {
    true
}
