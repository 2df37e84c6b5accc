//! # Host Bridge Traits
//!
//! Capability contracts the host platform implements for the core.
//!
//! ## Traits
//!
//! - [`AudioBackend`](playback::AudioBackend) / [`AudioResource`](playback::AudioResource):
//!   platform audio engine and one loaded stream
//! - [`RemoteListing`](storage::RemoteListing): enumerate audio files in remote storage
//! - [`LoggerSink`](logging::LoggerSink): forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Capability | Required | Fallback when missing |
//! |------------|----------|-----------------------|
//! | `AudioBackend` | no | simulated, clock-driven playback |
//! | `RemoteListing` | no | bundled static catalog |
//! | `LoggerSink` | no | `tracing-subscriber` stdout output only |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should map `NotAvailable` to "this platform cannot do it at all" so the
//! core can tell platform limitations from per-resource failures.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync`; the core shares them as
//! `Arc<dyn Trait>` across tasks.

pub mod error;
pub mod logging;
pub mod platform;
pub mod playback;
pub mod storage;

pub use error::BridgeError;

pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use playback::{AcquireOptions, AudioBackend, AudioResource, ResourceId, ResourceStatus};
pub use storage::{RemoteFile, RemoteListing};
