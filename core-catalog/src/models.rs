//! Domain models for the sound catalog
//!
//! Field names on the wire follow the catalog JSON served to the apps
//! (`imageUrl`, `audioUrl`, `duration` in seconds), so a bundled catalog file
//! deserializes straight into [`Track`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::classify::category_artwork;

// =============================================================================
// ID Types
// =============================================================================

/// Opaque track identifier.
///
/// Bundled tracks use short numeric strings, listing-backed tracks use the
/// storage provider's file id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for TrackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Track
// =============================================================================

/// A playable sound in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    /// Display name of the category, e.g. `"Nature"`
    pub category: String,
    /// Playable resource location handed to the audio backend
    #[serde(rename = "audioUrl", alias = "audioLocation")]
    pub audio_location: String,
    #[serde(rename = "imageUrl", alias = "artworkLocation", default)]
    pub artwork_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    /// Declared length in whole seconds
    #[serde(rename = "duration", alias = "durationSecs")]
    pub duration_secs: u32,
}

impl Track {
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        category: impl Into<String>,
        audio_location: impl Into<String>,
        duration_secs: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            audio_location: audio_location.into(),
            artwork_location: String::new(),
            description: None,
            is_premium: false,
            duration_secs,
        }
    }

    pub fn with_artwork(mut self, artwork_location: impl Into<String>) -> Self {
        self.artwork_location = artwork_location.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_premium(mut self, is_premium: bool) -> Self {
        self.is_premium = is_premium;
        self
    }

    /// Declared duration, used when the audio engine does not report one.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }

    /// Lowercase slug of the category, matching [`Category::id`].
    pub fn category_id(&self) -> String {
        self.category.to_lowercase()
    }

    /// Validate track fields
    pub fn validate(&self) -> Result<(), String> {
        if self.id.as_str().trim().is_empty() {
            return Err("Track id cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            return Err("Track title cannot be empty".to_string());
        }

        if self.audio_location.trim().is_empty() {
            return Err("Track audio location cannot be empty".to_string());
        }

        Ok(())
    }
}

// =============================================================================
// Category
// =============================================================================

/// A browsable group of tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Lowercase slug, e.g. `"nature"`
    pub id: String,
    pub name: String,
    #[serde(rename = "imageUrl", alias = "artworkLocation", default)]
    pub artwork_location: String,
    #[serde(rename = "soundCount", default, skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u32>,
}

impl Category {
    /// Build the category list for `tracks`, in order of first appearance,
    /// with per-category counts.
    pub fn derive_from(tracks: &[Track]) -> Vec<Category> {
        let mut categories: Vec<Category> = Vec::new();

        for track in tracks {
            match categories.iter_mut().find(|c| c.name == track.category) {
                Some(category) => {
                    category.track_count = Some(category.track_count.unwrap_or(0) + 1);
                }
                None => {
                    let id = track.category_id();
                    categories.push(Category {
                        artwork_location: category_artwork(&id).to_string(),
                        id,
                        name: track.category.clone(),
                        track_count: Some(1),
                    });
                }
            }
        }

        categories
    }
}
