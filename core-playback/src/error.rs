//! # Playback Error Types
//!
//! Classification of failures inside the playback controller.
//!
//! Backend failures never escape the session commands; the controller maps
//! them to a [`PlaybackError`] to decide between falling back, pausing and
//! logging, and mirrors them as `PlaybackEvent::Error`.

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// The backend could not load the track's audio resource.
    #[error("Failed to acquire audio resource: {0}")]
    AcquireFailed(#[source] BridgeError),

    /// A loaded resource failed a status, seek or resume request.
    #[error("Audio resource error: {0}")]
    ResourceFailed(#[source] BridgeError),

    /// The resource was unloaded underneath the session.
    #[error("Audio resource no longer loaded")]
    ResourceUnloaded,

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// The sleep timer feature is disabled by configuration.
    #[error("Sleep timer is disabled")]
    SleepTimerDisabled,

    /// The controller was shut down.
    #[error("Playback controller is shut down")]
    ShutDown,

    /// Invalid configuration value.
    #[error("Invalid playback configuration: {0}")]
    InvalidConfig(String),
}

impl PlaybackError {
    /// Classify a failure while loading a resource.
    pub fn acquire(err: BridgeError) -> Self {
        match err {
            BridgeError::ResourceUnloaded => PlaybackError::ResourceUnloaded,
            other => PlaybackError::AcquireFailed(other),
        }
    }

    /// Classify a failure on an already loaded resource.
    pub fn resource(err: BridgeError) -> Self {
        match err {
            BridgeError::ResourceUnloaded => PlaybackError::ResourceUnloaded,
            other => PlaybackError::ResourceFailed(other),
        }
    }

    fn bridge_error(&self) -> Option<&BridgeError> {
        match self {
            PlaybackError::AcquireFailed(err) | PlaybackError::ResourceFailed(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if retrying the same command may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.bridge_error(),
            Some(BridgeError::Network(_)) | Some(BridgeError::Io(_))
        )
    }

    /// Returns `true` if the platform cannot play audio at all.
    pub fn is_platform_limitation(&self) -> bool {
        self.bridge_error()
            .map(BridgeError::is_platform_limitation)
            .unwrap_or(false)
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
