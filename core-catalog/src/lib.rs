//! # Track Catalog
//!
//! Supplies the tracks the player can play.
//!
//! ## Overview
//!
//! - [`TrackCatalog`]: lookup by id plus the browsing helpers used by the
//!   home, category and search screens
//! - [`StaticCatalog`]: bundled seed tracks or a JSON document
//! - [`ListingCatalog`]: tracks derived from a remote storage listing, with
//!   an offline fallback
//!
//! ```rust
//! use core_catalog::{StaticCatalog, TrackCatalog, TrackId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = StaticCatalog::builtin();
//! let track = catalog.lookup_track(&TrackId::from("2")).await.unwrap();
//! assert_eq!(track.title, "Ocean Waves");
//! # }
//! ```

pub mod catalog;
pub mod classify;
pub mod error;
pub mod listing;
pub mod models;
pub mod static_catalog;

pub use catalog::TrackCatalog;
pub use error::{CatalogError, Result};
pub use listing::{CatalogSource, ListingCatalog};
pub use models::{Category, Track, TrackId};
pub use static_catalog::StaticCatalog;
