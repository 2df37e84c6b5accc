//! # Event Bus System
//!
//! Typed event broadcasting for the ambience player core, built on
//! `tokio::sync::broadcast` (through `core_async::sync`).
//!
//! ## Overview
//!
//! The session snapshot channel exposed by the playback controller tells a
//! subscriber what the session looks like *now*. The event bus complements it
//! with what *happened*: a track started, the simulated fallback engaged, the
//! sleep timer fired. Presentation code typically renders from the snapshot
//! and uses events for toasts, analytics and logging.
//!
//! ```text
//! ┌──────────────┐   emit    ┌───────────┐   subscribe   ┌────────────┐
//! │  Controller  ├──────────>│           ├──────────────>│ Subscriber │
//! └──────────────┘           │ EventBus  │               └────────────┘
//! ┌──────────────┐   emit    │           │   subscribe   ┌────────────┐
//! │   Catalog    ├──────────>│           ├──────────────>│ Subscriber │
//! └──────────────┘           └───────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(16);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Playback(PlaybackEvent::Stopped { track_id: None }))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.description(), "Playback stopped");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events; it can keep
//!   receiving.
//! - **`RecvError::Closed`**: every sender is gone, i.e. the core shut down.
//!
//! `emit` returns an error when nobody is subscribed. Publishers in the core
//! ignore that error: events are advisory.

use core_async::sync::broadcast;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Position updates arrive once per poll interval, so a hundred events
/// covers well over a minute of an idle subscriber.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published through the event bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Playback session events
    Playback(PlaybackEvent),
    /// Catalog loading events
    Catalog(CatalogEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Catalog(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::FallbackEngaged { .. }) => EventSeverity::Warning,
            CoreEvent::Catalog(CatalogEvent::FallbackUsed { .. }) => EventSeverity::Warning,
            CoreEvent::Playback(PlaybackEvent::Started { .. })
            | CoreEvent::Playback(PlaybackEvent::Completed { .. })
            | CoreEvent::Playback(PlaybackEvent::SleepTimerFired { .. })
            | CoreEvent::Catalog(CatalogEvent::Loaded { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Events related to the playback session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A load was requested and acquisition began.
    Loading {
        track_id: String,
    },
    /// Playback started on a freshly loaded resource.
    Started {
        track_id: String,
        title: String,
        /// Whether playback is clock-driven rather than real audio.
        simulated: bool,
    },
    /// Playback paused.
    Paused {
        track_id: String,
        /// Position when paused (milliseconds).
        position_ms: u64,
    },
    /// Playback resumed after pause.
    Resumed {
        track_id: String,
        position_ms: u64,
    },
    /// Playback stopped and the resource was released.
    Stopped {
        /// Track that was loaded, if any.
        track_id: Option<String>,
    },
    /// Track finished playing naturally.
    Completed {
        track_id: String,
    },
    /// Playback position changed (seek or poll).
    PositionChanged {
        track_id: String,
        position_ms: u64,
        duration_ms: u64,
    },
    /// Volume changed.
    VolumeChanged {
        /// Volume in percent, 0-100.
        volume_percent: u8,
    },
    /// Acquisition failed and the session switched to simulated playback.
    FallbackEngaged {
        track_id: String,
        reason: String,
    },
    /// Sleep timer armed. `minutes` is `None` for "end of current track".
    SleepTimerArmed {
        minutes: Option<u32>,
    },
    /// Sleep timer cancelled before firing.
    SleepTimerCancelled,
    /// Sleep timer fired and playback was stopped.
    SleepTimerFired {
        track_id: Option<String>,
    },
    /// Playback error occurred.
    Error {
        track_id: Option<String>,
        message: String,
        /// Whether retrying the command may succeed.
        recoverable: bool,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Loading { .. } => "Track loading",
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Resumed { .. } => "Playback resumed",
            PlaybackEvent::Stopped { .. } => "Playback stopped",
            PlaybackEvent::Completed { .. } => "Track completed",
            PlaybackEvent::PositionChanged { .. } => "Playback position changed",
            PlaybackEvent::VolumeChanged { .. } => "Volume changed",
            PlaybackEvent::FallbackEngaged { .. } => "Simulated playback engaged",
            PlaybackEvent::SleepTimerArmed { .. } => "Sleep timer armed",
            PlaybackEvent::SleepTimerCancelled => "Sleep timer cancelled",
            PlaybackEvent::SleepTimerFired { .. } => "Sleep timer fired",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Catalog Events
// ============================================================================

/// Events related to catalog loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CatalogEvent {
    /// Catalog contents (re)loaded.
    Loaded {
        /// Where the tracks came from (e.g. `"static"`, `"remote"`).
        source: String,
        track_count: usize,
        category_count: usize,
    },
    /// Remote listing failed; bundled tracks are being served instead.
    FallbackUsed {
        reason: String,
    },
}

impl CatalogEvent {
    fn description(&self) -> &str {
        match self {
            CatalogEvent::Loaded { .. } => "Catalog loaded",
            CatalogEvent::FallbackUsed { .. } => "Catalog fell back to bundled tracks",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning the bus clones the sender; every clone publishes into the same
/// channel. Each [`subscribe`](EventBus::subscribe) call creates an
/// independent receiver that only sees events emitted after it subscribed.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified per-subscriber buffer.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Publishes a playback event, ignoring the no-subscriber case.
    pub fn emit_playback(&self, event: PlaybackEvent) {
        let _ = self.sender.send(CoreEvent::Playback(event));
    }

    /// Publishes a catalog event, ignoring the no-subscriber case.
    pub fn emit_catalog(&self, event: CatalogEvent) {
        let _ = self.sender.send(CoreEvent::Catalog(event));
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional filter.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(16);
/// let playback_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Playback(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    ///
    /// Returns `None` if no matching event is currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn started(track_id: &str) -> CoreEvent {
        CoreEvent::Playback(PlaybackEvent::Started {
            track_id: track_id.to_string(),
            title: "Ocean Waves".to_string(),
            simulated: false,
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(started("2")).is_err());

        // The convenience emitters swallow the error.
        bus.emit_playback(PlaybackEvent::SleepTimerCancelled);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = started("1");
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Catalog(_)));

        bus.emit(started("1")).ok();
        let catalog_event = CoreEvent::Catalog(CatalogEvent::Loaded {
            source: "static".to_string(),
            track_count: 8,
            category_count: 5,
        });
        bus.emit(catalog_event.clone()).ok();

        assert_eq!(stream.recv().await.unwrap(), catalog_event);
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit_playback(PlaybackEvent::PositionChanged {
                track_id: "1".to_string(),
                position_ms: i * 1000,
                duration_ms: 180_000,
            });
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        let error_event = CoreEvent::Playback(PlaybackEvent::Error {
            track_id: None,
            message: "status query failed".to_string(),
            recoverable: true,
        });
        assert_eq!(error_event.severity(), EventSeverity::Error);

        let fallback = CoreEvent::Playback(PlaybackEvent::FallbackEngaged {
            track_id: "3".to_string(),
            reason: "network".to_string(),
        });
        assert_eq!(fallback.severity(), EventSeverity::Warning);

        assert_eq!(started("1").severity(), EventSeverity::Info);

        let position = CoreEvent::Playback(PlaybackEvent::PositionChanged {
            track_id: "1".to_string(),
            position_ms: 5000,
            duration_ms: 180_000,
        });
        assert_eq!(position.severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        let event = CoreEvent::Catalog(CatalogEvent::FallbackUsed {
            reason: "listing unavailable".to_string(),
        });
        assert_eq!(event.description(), "Catalog fell back to bundled tracks");
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Playback(PlaybackEvent::SleepTimerArmed { minutes: Some(15) });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Playback\""));
        assert!(json.contains("SleepTimerArmed"));

        let deserialized: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_concurrent_publishers() {
        let bus = EventBus::new(100);
        let mut sub = bus.subscribe();

        let bus1 = bus.clone();
        let bus2 = bus.clone();

        let handle1 = tokio::spawn(async move {
            for i in 0..10 {
                bus1.emit(started(&i.to_string())).ok();
            }
        });
        let handle2 = tokio::spawn(async move {
            for i in 0..10u8 {
                bus2.emit_playback(PlaybackEvent::VolumeChanged {
                    volume_percent: i * 10,
                });
            }
        });

        handle1.await.ok();
        handle2.await.ok();

        let mut count = 0;
        while sub.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 20);
    }
}
