//! Track catalog interface
//!
//! The playback controller never browses; it receives a resolved [`Track`].
//! The service layer resolves ids through [`TrackCatalog::lookup_track`], and
//! presentation code uses the listing helpers.

use crate::error::{CatalogError, Result};
use crate::models::{Category, Track, TrackId};
use async_trait::async_trait;

/// Number of tracks returned by [`TrackCatalog::featured_tracks`] and
/// [`TrackCatalog::recent_tracks`].
pub const SHELF_SIZE: usize = 6;

/// Read-only access to the catalog of playable tracks.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Resolve a track by id.
    ///
    /// # Errors
    /// [`CatalogError::NotFound`] when no track has this id.
    async fn lookup_track(&self, id: &TrackId) -> Result<Track>;

    /// Every track, in catalog order.
    async fn list_tracks(&self) -> Vec<Track>;

    /// Categories with their track counts.
    async fn categories(&self) -> Vec<Category>;

    /// Tracks in a category; `category_id` is matched case-insensitively
    /// against the track's category name.
    async fn tracks_by_category(&self, category_id: &str) -> Vec<Track> {
        let wanted = category_id.to_lowercase();
        self.list_tracks()
            .await
            .into_iter()
            .filter(|track| track.category_id() == wanted)
            .collect()
    }

    /// The first tracks of the catalog.
    async fn featured_tracks(&self) -> Vec<Track> {
        let mut tracks = self.list_tracks().await;
        tracks.truncate(SHELF_SIZE);
        tracks
    }

    /// The last tracks of the catalog.
    async fn recent_tracks(&self) -> Vec<Track> {
        let tracks = self.list_tracks().await;
        let start = tracks.len().saturating_sub(SHELF_SIZE);
        tracks[start..].to_vec()
    }

    /// Case-insensitive substring search over title and category.
    async fn search(&self, query: &str) -> Vec<Track> {
        let needle = query.to_lowercase();
        self.list_tracks()
            .await
            .into_iter()
            .filter(|track| {
                track.title.to_lowercase().contains(&needle)
                    || track.category.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// Linear lookup shared by the in-memory catalogs.
pub(crate) fn find_track(tracks: &[Track], id: &TrackId) -> Result<Track> {
    tracks
        .iter()
        .find(|track| &track.id == id)
        .cloned()
        .ok_or_else(|| CatalogError::not_found(id.as_str()))
}
