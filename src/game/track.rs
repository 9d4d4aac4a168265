//! Track metadata as loaded from the catalog, plus the built-in fallback pool.

use serde::Serialize;
use utoipa::ToSchema;

/// Sentinel preview locator marking a track that has no real preview audio;
/// clients render a placeholder instead of streaming anything.
pub const PLACEHOLDER_PREVIEW: &str = "mock";

/// Candidate track within a game session's pool. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Track {
    /// Catalog identifier, unique within a pool.
    pub id: String,
    /// Display name of the track.
    pub name: String,
    /// Primary artist display name.
    pub artist: String,
    /// Preview audio locator; `None` when the catalog exposes no preview,
    /// [`PLACEHOLDER_PREVIEW`] when only a placeholder should be shown.
    pub preview_url: Option<String>,
    /// Album artwork locator, when the catalog provides one.
    pub artwork_url: Option<String>,
}

impl Track {
    /// Whether this track carries preview audio that can actually be played.
    pub fn has_real_preview(&self) -> bool {
        matches!(self.preview_url.as_deref(), Some(url) if url != PLACEHOLDER_PREVIEW)
    }
}

/// Built-in pool used when the catalog is unreachable or returns too few
/// usable tracks. Every entry carries the placeholder preview sentinel.
pub fn mock_tracks() -> Vec<Track> {
    const ENTRIES: [(&str, &str, &str); 20] = [
        ("1", "Blinding Lights", "The Weeknd"),
        ("2", "Shape of You", "Ed Sheeran"),
        ("3", "Dance Monkey", "Tones and I"),
        ("4", "Someone Like You", "Adele"),
        ("5", "Uptown Funk", "Mark Ronson ft. Bruno Mars"),
        ("6", "Bohemian Rhapsody", "Queen"),
        ("7", "Hotel California", "Eagles"),
        ("8", "Smells Like Teen Spirit", "Nirvana"),
        ("9", "Billie Jean", "Michael Jackson"),
        ("10", "Wonderwall", "Oasis"),
        ("11", "Sweet Child O' Mine", "Guns N' Roses"),
        ("12", "Rolling in the Deep", "Adele"),
        ("13", "Thinking Out Loud", "Ed Sheeran"),
        ("14", "Shallow", "Lady Gaga & Bradley Cooper"),
        ("15", "Bad Guy", "Billie Eilish"),
        ("16", "Levitating", "Dua Lipa"),
        ("17", "drivers license", "Olivia Rodrigo"),
        ("18", "Dynamite", "BTS"),
        ("19", "Watermelon Sugar", "Harry Styles"),
        ("20", "Peaches", "Justin Bieber"),
    ];

    ENTRIES
        .into_iter()
        .map(|(id, name, artist)| Track {
            id: id.into(),
            name: name.into(),
            artist: artist.into(),
            preview_url: Some(PLACEHOLDER_PREVIEW.into()),
            artwork_url: None,
        })
        .collect()
}
