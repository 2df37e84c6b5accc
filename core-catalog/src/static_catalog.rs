//! In-memory catalog
//!
//! Serves a fixed set of tracks: the bundled seed sounds, a JSON document
//! shipped with the host, or any `Vec<Track>` (tests).

use crate::catalog::{find_track, TrackCatalog};
use crate::error::{CatalogError, Result};
use crate::models::{Category, Track, TrackId};
use async_trait::async_trait;
use tracing::debug;

/// Catalog over a fixed list of tracks.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    tracks: Vec<Track>,
    categories: Vec<Category>,
}

impl StaticCatalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        let categories = Category::derive_from(&tracks);
        Self { tracks, categories }
    }

    /// Parse a JSON array of tracks.
    ///
    /// # Errors
    /// [`CatalogError::Parse`] for malformed JSON, [`CatalogError::InvalidTrack`]
    /// when an entry fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json)?;

        for track in &tracks {
            track
                .validate()
                .map_err(|message| CatalogError::InvalidTrack {
                    id: track.id.to_string(),
                    message,
                })?;
        }

        debug!(track_count = tracks.len(), "Parsed catalog JSON");
        Ok(Self::new(tracks))
    }

    /// The seed sounds bundled with the app.
    pub fn builtin() -> Self {
        Self::new(builtin_tracks())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[async_trait]
impl TrackCatalog for StaticCatalog {
    async fn lookup_track(&self, id: &TrackId) -> Result<Track> {
        find_track(&self.tracks, id)
    }

    async fn list_tracks(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    async fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }
}

fn builtin_tracks() -> Vec<Track> {
    vec![
        Track::new(
            "1",
            "Rainforest Ambience",
            "Nature",
            "https://cdn.pixabay.com/download/audio/2022/02/22/audio_d1ed1e5c36.mp3",
            180,
        )
        .with_artwork("https://images.pexels.com/photos/1671324/pexels-photo-1671324.jpeg")
        .with_description(
            "Immerse yourself in the soothing sounds of a tropical rainforest. \
             Perfect for relaxation and stress relief.",
        ),
        Track::new(
            "2",
            "Ocean Waves",
            "Nature",
            "https://cdn.pixabay.com/download/audio/2021/08/09/audio_88447e769f.mp3",
            240,
        )
        .with_artwork("https://images.pexels.com/photos/1076429/pexels-photo-1076429.jpeg")
        .with_description(
            "Let the rhythmic sound of ocean waves calm your mind and help you focus or sleep.",
        ),
        Track::new(
            "3",
            "Deep Meditation",
            "Meditation",
            "https://cdn.pixabay.com/download/audio/2022/03/15/audio_c8c8a73467.mp3",
            300,
        )
        .with_artwork("https://images.pexels.com/photos/3560044/pexels-photo-3560044.jpeg")
        .with_description(
            "A carefully crafted sound experience designed to guide you into a state of deep meditation.",
        )
        .with_premium(true),
        Track::new(
            "4",
            "Thunderstorm",
            "Sleep",
            "https://cdn.pixabay.com/download/audio/2021/08/09/audio_6e059c5d60.mp3",
            240,
        )
        .with_artwork("https://images.pexels.com/photos/2258536/pexels-photo-2258536.jpeg")
        .with_description(
            "The distant rumble of thunder and gentle rain creates a perfect backdrop for sleep.",
        ),
        Track::new(
            "5",
            "Campfire",
            "Ambient",
            "https://cdn.pixabay.com/download/audio/2021/08/09/audio_c4e667dd0c.mp3",
            210,
        )
        .with_artwork("https://images.pexels.com/photos/1368382/pexels-photo-1368382.jpeg")
        .with_description("The crackling sounds of a cozy campfire to help you relax and unwind."),
        Track::new(
            "6",
            "Study Focus",
            "Focus",
            "https://cdn.pixabay.com/download/audio/2022/03/19/audio_270cbe5e0f.mp3",
            270,
        )
        .with_artwork("https://images.pexels.com/photos/590493/pexels-photo-590493.jpeg")
        .with_description(
            "Designed to enhance concentration and productivity during study or work sessions.",
        )
        .with_premium(true),
        Track::new(
            "7",
            "Wind Chimes",
            "Meditation",
            "https://cdn.pixabay.com/download/audio/2021/08/09/audio_20cb2a5e3d.mp3",
            190,
        )
        .with_artwork("https://images.pexels.com/photos/2097616/pexels-photo-2097616.jpeg")
        .with_description(
            "Delicate wind chimes create a peaceful atmosphere for meditation and mindfulness.",
        ),
        Track::new(
            "8",
            "Night Jungle",
            "Sleep",
            "https://cdn.pixabay.com/download/audio/2022/01/18/audio_d0c6ff1bab.mp3",
            320,
        )
        .with_artwork("https://images.pexels.com/photos/3608881/pexels-photo-3608881.jpeg")
        .with_description(
            "Experience the magical sounds of a jungle at night as you drift off to sleep.",
        )
        .with_premium(true),
    ]
}
