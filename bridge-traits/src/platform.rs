//! Platform helper bounds.
//!
//! Bridge implementations are shared across async tasks as `Arc<dyn Trait>`,
//! so every bridge trait requires `Send + Sync`. The marker trait keeps that
//! bound spelled once.

/// Marker trait for bridge implementations that may be shared across tasks.
pub trait PlatformSendSync: Send + Sync {}

impl<T> PlatformSendSync for T where T: Send + Sync {}
