//! Workspace placeholder crate.
//!
//! Exposes feature flags that map to the individual workspace crates so a
//! host application can depend on `ambience-workspace` alone. The default
//! `service` feature pulls in the full façade (`core-service`), while
//! `catalog` and `playback` expose the lower-level crates for hosts that wire
//! things themselves.

#[cfg(feature = "service")]
pub use core_service as service;

#[cfg(feature = "catalog")]
pub use core_catalog as catalog;

#[cfg(feature = "playback")]
pub use core_playback as playback;
