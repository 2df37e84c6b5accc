//! Filename heuristics for listing-backed catalogs.
//!
//! Remote storage only gives us a file name, a MIME type and a size. These
//! helpers turn that into a category, a display title, an estimated length
//! and artwork.

use sha2::{Digest, Sha256};

/// Keyword patterns per category. Checked in order; first match wins.
pub const CATEGORY_PATTERNS: &[(&str, &[&str])] = &[
    (
        "nature",
        &["rain", "ocean", "forest", "bird", "water", "wind", "thunder", "storm"],
    ),
    (
        "meditation",
        &["meditation", "zen", "om", "chant", "mindful", "breath", "calm"],
    ),
    ("sleep", &["sleep", "lullaby", "night", "dream", "bedtime", "rest"]),
    (
        "focus",
        &[
            "focus",
            "concentration",
            "study",
            "work",
            "productivity",
            "white noise",
            "brown noise",
        ],
    ),
    (
        "ambient",
        &["ambient", "atmosphere", "space", "drone", "pad", "texture"],
    ),
    (
        "music",
        &["music", "melody", "song", "instrumental", "piano", "guitar"],
    ),
    ("urban", &["city", "traffic", "cafe", "street", "urban", "crowd"]),
    (
        "animals",
        &["cat", "dog", "whale", "dolphin", "cricket", "frog", "animal"],
    ),
];

pub const DEFAULT_CATEGORY: &str = "ambient";

const CATEGORY_ARTWORK: &[(&str, &str)] = &[
    (
        "nature",
        "https://images.pexels.com/photos/957024/forest-trees-perspective-bright-957024.jpeg",
    ),
    (
        "meditation",
        "https://images.pexels.com/photos/3560044/pexels-photo-3560044.jpeg",
    ),
    (
        "sleep",
        "https://images.pexels.com/photos/3642711/pexels-photo-3642711.jpeg",
    ),
    (
        "focus",
        "https://images.pexels.com/photos/1122868/pexels-photo-1122868.jpeg",
    ),
    (
        "ambient",
        "https://images.pexels.com/photos/396547/pexels-photo-396547.jpeg",
    ),
    (
        "music",
        "https://images.pexels.com/photos/164821/pexels-photo-164821.jpeg",
    ),
    (
        "urban",
        "https://images.pexels.com/photos/378570/pexels-photo-378570.jpeg",
    ),
    (
        "animals",
        "https://images.pexels.com/photos/45853/grey-crowned-crane-bird-crane-animal-45853.jpeg",
    ),
];

/// Artwork pool for individual tracks without their own image.
pub const TRACK_ARTWORK_POOL: &[&str] = &[
    "https://images.pexels.com/photos/1671324/pexels-photo-1671324.jpeg",
    "https://images.pexels.com/photos/1076429/pexels-photo-1076429.jpeg",
    "https://images.pexels.com/photos/2258536/pexels-photo-2258536.jpeg",
    "https://images.pexels.com/photos/1368382/pexels-photo-1368382.jpeg",
    "https://images.pexels.com/photos/3608881/pexels-photo-3608881.jpeg",
    "https://images.pexels.com/photos/2097616/pexels-photo-2097616.jpeg",
    "https://images.pexels.com/photos/590493/pexels-photo-590493.jpeg",
];

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg"];

/// Bytes per second assumed when estimating length from file size.
const ESTIMATE_BYTES_PER_SECOND: u64 = 50_000;
const MIN_ESTIMATED_SECS: u64 = 60;
const MAX_ESTIMATED_SECS: u64 = 600;

/// Whether a listed file should appear in the catalog.
pub fn is_audio_file(file_name: &str, content_type: Option<&str>) -> bool {
    if content_type.is_some_and(|ct| ct.contains("audio")) {
        return true;
    }

    match file_name.rsplit_once('.') {
        Some((_, ext)) => AUDIO_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        None => false,
    }
}

/// Lowercase category slug for a file name.
pub fn categorize(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();

    CATEGORY_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|pattern| lower.contains(pattern)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Uppercase the first character.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display title for a file name.
///
/// `"rain_on-tin_roof.mp3"` becomes `"Rain On Tin Roof"`.
pub fn format_title(file_name: &str) -> String {
    let stem = strip_extension(file_name);
    let spaced = stem.replace(['_', '-'], " ");

    let mut title = String::with_capacity(spaced.len());
    let mut prev_is_word = false;
    for c in spaced.chars() {
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            title.push(c.to_ascii_uppercase());
        } else {
            title.push(c);
        }
        prev_is_word = is_word;
    }
    title
}

/// Remove a trailing `.ext` when the extension holds no `/` or `.`.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx + 1 < file_name.len() && !file_name[idx + 1..].contains('/') => {
            &file_name[..idx]
        }
        _ => file_name,
    }
}

/// Estimated length in seconds from the byte size, clamped to 60..=600.
pub fn estimate_duration_secs(content_length: u64) -> u32 {
    let secs = (content_length / ESTIMATE_BYTES_PER_SECOND).clamp(MIN_ESTIMATED_SECS, MAX_ESTIMATED_SECS);
    secs as u32
}

/// Artwork for a category slug, ambient artwork for unknown slugs.
pub fn category_artwork(category_id: &str) -> &'static str {
    let lookup = |id: &str| {
        CATEGORY_ARTWORK
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, url)| *url)
    };

    lookup(category_id)
        .or_else(|| lookup(DEFAULT_CATEGORY))
        .unwrap_or(TRACK_ARTWORK_POOL[0])
}

/// Stable per-file traits derived from a SHA-256 of the file id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTraits {
    pub artwork: &'static str,
    pub is_premium: bool,
}

/// About 30% of files come out premium.
pub fn file_traits(file_id: &str) -> FileTraits {
    let digest = Sha256::digest(file_id.as_bytes());

    let mut artwork_bytes = [0u8; 8];
    artwork_bytes.copy_from_slice(&digest[..8]);
    let mut premium_bytes = [0u8; 8];
    premium_bytes.copy_from_slice(&digest[8..16]);

    let artwork_index = (u64::from_be_bytes(artwork_bytes) % TRACK_ARTWORK_POOL.len() as u64) as usize;
    let premium_roll = u64::from_be_bytes(premium_bytes) % 10;

    FileTraits {
        artwork: TRACK_ARTWORK_POOL[artwork_index],
        is_premium: premium_roll >= 7,
    }
}
