//! Catalog backed by a remote storage listing
//!
//! [`ListingCatalog::load`] lists the bucket through the host's
//! [`RemoteListing`], keeps the audio files and derives track metadata from
//! file names (see [`crate::classify`]). When the listing fails the catalog
//! serves a small built-in fallback set so the app stays usable offline.
//!
//! The catalog is empty until the first `load()`.

use crate::catalog::{find_track, TrackCatalog};
use crate::classify::{
    capitalize, categorize, estimate_duration_secs, file_traits, format_title, is_audio_file,
};
use crate::error::Result;
use crate::models::{Category, Track, TrackId};
use async_trait::async_trait;
use bridge_traits::storage::{RemoteFile, RemoteListing};
use core_runtime::events::{CatalogEvent, EventBus};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Where the current catalog contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// `load()` has not completed yet
    Empty,
    /// Tracks derived from the remote listing
    Remote,
    /// Listing failed, built-in fallback tracks are served
    Fallback,
    /// No listing configured, the bundled seed tracks are served
    Bundled,
}

impl CatalogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogSource::Empty => "empty",
            CatalogSource::Remote => "remote",
            CatalogSource::Fallback => "fallback",
            CatalogSource::Bundled => "bundled",
        }
    }
}

#[derive(Debug)]
struct CatalogState {
    tracks: Vec<Track>,
    categories: Vec<Category>,
    source: CatalogSource,
}

/// Catalog populated from a [`RemoteListing`].
pub struct ListingCatalog {
    listing: Arc<dyn RemoteListing>,
    state: RwLock<CatalogState>,
    events: Option<EventBus>,
}

impl ListingCatalog {
    pub fn new(listing: Arc<dyn RemoteListing>) -> Self {
        Self {
            listing,
            state: RwLock::new(CatalogState {
                tracks: Vec::new(),
                categories: Vec::new(),
                source: CatalogSource::Empty,
            }),
            events: None,
        }
    }

    /// Publish [`CatalogEvent`]s on every load.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// (Re)load the catalog from the listing.
    ///
    /// Never fails: listing errors are logged and the fallback tracks are
    /// installed instead. Returns where the new contents came from.
    #[instrument(skip(self))]
    pub async fn load(&self) -> CatalogSource {
        let (tracks, source) = match self.listing.list_files().await {
            Ok(files) => {
                let tracks: Vec<Track> = files
                    .iter()
                    .filter(|file| is_audio_file(&file.file_name, file.content_type.as_deref()))
                    .map(|file| self.track_from_file(file))
                    .collect();
                info!(
                    listed = files.len(),
                    audio = tracks.len(),
                    "Loaded tracks from remote listing"
                );
                (tracks, CatalogSource::Remote)
            }
            Err(err) => {
                warn!(error = %err, "Remote listing failed, using fallback tracks");
                if let Some(events) = &self.events {
                    events.emit_catalog(CatalogEvent::FallbackUsed {
                        reason: err.to_string(),
                    });
                }
                (fallback_tracks(), CatalogSource::Fallback)
            }
        };

        let categories = Category::derive_from(&tracks);
        if let Some(events) = &self.events {
            events.emit_catalog(CatalogEvent::Loaded {
                source: source.as_str().to_string(),
                track_count: tracks.len(),
                category_count: categories.len(),
            });
        }

        *self.state.write() = CatalogState {
            tracks,
            categories,
            source,
        };
        source
    }

    pub fn source(&self) -> CatalogSource {
        self.state.read().source
    }

    fn track_from_file(&self, file: &RemoteFile) -> Track {
        let category = categorize(&file.file_name);
        let traits = file_traits(&file.file_id);

        Track::new(
            file.file_id.as_str(),
            format_title(&file.file_name),
            capitalize(category),
            self.listing.download_url(&file.file_name),
            estimate_duration_secs(file.content_length),
        )
        .with_artwork(traits.artwork)
        .with_description(format!(
            "A {} sound perfect for relaxation and focus.",
            category
        ))
        .with_premium(traits.is_premium)
    }
}

#[async_trait]
impl TrackCatalog for ListingCatalog {
    async fn lookup_track(&self, id: &TrackId) -> Result<Track> {
        find_track(&self.state.read().tracks, id)
    }

    async fn list_tracks(&self) -> Vec<Track> {
        self.state.read().tracks.clone()
    }

    async fn categories(&self) -> Vec<Category> {
        self.state.read().categories.clone()
    }
}

/// Tracks served when the remote listing is unreachable.
pub fn fallback_tracks() -> Vec<Track> {
    vec![
        Track::new(
            "mock-1",
            "Rainforest Ambience",
            "Nature",
            "https://www.soundjay.com/misc/sounds/rain-01.mp3",
            180,
        )
        .with_artwork("https://images.pexels.com/photos/1671324/pexels-photo-1671324.jpeg")
        .with_description("Soothing rainforest sounds for relaxation."),
        Track::new(
            "mock-2",
            "Ocean Waves",
            "Nature",
            "https://www.soundjay.com/misc/sounds/ocean-01.mp3",
            240,
        )
        .with_artwork("https://images.pexels.com/photos/1076429/pexels-photo-1076429.jpeg")
        .with_description("Calming ocean waves for sleep and meditation."),
    ]
}
