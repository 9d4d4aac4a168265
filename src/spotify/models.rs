//! Wire models for the subset of the Spotify Web API the game consumes.

use serde::Deserialize;

use crate::game::track::Track;
use crate::playback::remote::PlaybackSample;

/// Track object as returned inside playlists and top-tracks listings.
#[derive(Debug, Deserialize)]
pub struct TrackObject {
    /// Catalog id; local files have none and are skipped.
    pub id: Option<String>,
    /// Track display name.
    pub name: String,
    /// Credited artists, first one is displayed.
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    /// Preview audio URL, frequently absent.
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Album container holding the artwork.
    #[serde(default)]
    pub album: Option<AlbumObject>,
}

/// Artist name holder.
#[derive(Debug, Deserialize)]
pub struct ArtistObject {
    /// Artist display name.
    pub name: String,
}

/// Album subset: artwork only.
#[derive(Debug, Deserialize)]
pub struct AlbumObject {
    /// Artwork images, largest first.
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

/// One artwork rendition.
#[derive(Debug, Deserialize)]
pub struct ImageObject {
    /// Image URL.
    pub url: String,
}

impl TrackObject {
    /// Convert into the game's [`Track`]; `None` for entries without a catalog id.
    pub fn into_track(self) -> Option<Track> {
        let id = self.id?;
        let artist = self
            .artists
            .into_iter()
            .next()
            .map(|artist| artist.name)
            .unwrap_or_else(|| "Unknown Artist".into());
        let artwork_url = self
            .album
            .and_then(|album| album.images.into_iter().next())
            .map(|image| image.url);

        Some(Track {
            id,
            name: self.name,
            artist,
            preview_url: self.preview_url,
            artwork_url,
        })
    }
}

/// `GET /v1/me/top/tracks` payload.
#[derive(Debug, Deserialize)]
pub struct TopTracksResponse {
    /// Listed tracks.
    #[serde(default)]
    pub items: Vec<TrackObject>,
}

/// `GET /v1/playlists/{id}` payload, reduced to its track list.
#[derive(Debug, Deserialize)]
pub struct PlaylistResponse {
    /// Paged track container; absent on malformed playlists.
    #[serde(default)]
    pub tracks: Option<PlaylistTracksPage>,
}

/// Page of playlist entries.
#[derive(Debug, Deserialize)]
pub struct PlaylistTracksPage {
    /// Playlist entries; `track` is null for removed items.
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

/// One playlist entry wrapper.
#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    /// The wrapped track, when still available.
    #[serde(default)]
    pub track: Option<TrackObject>,
}

/// `GET /v1/me` subset for the premium check.
#[derive(Debug, Deserialize)]
pub struct UserProfile {
    /// Subscription level, `"premium"` for premium accounts.
    #[serde(default)]
    pub product: Option<String>,
}

/// `GET /v1/me/player` subset for progress polling.
#[derive(Debug, Deserialize)]
pub struct PlayerState {
    /// Playhead position in milliseconds.
    #[serde(default)]
    pub progress_ms: Option<u64>,
    /// Whether the player reports active playback.
    #[serde(default)]
    pub is_playing: bool,
    /// Currently loaded item; carries the duration once known.
    #[serde(default)]
    pub item: Option<PlayerItem>,
}

/// Currently playing item subset.
#[derive(Debug, Deserialize)]
pub struct PlayerItem {
    /// Track length in milliseconds.
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl PlayerState {
    /// Flatten into the reconciler's sample shape; a missing duration maps to
    /// `0`, which the reconciler treats as "not reported yet".
    pub fn into_sample(self) -> PlaybackSample {
        PlaybackSample {
            position_ms: self.progress_ms.unwrap_or(0),
            duration_ms: self
                .item
                .and_then(|item| item.duration_ms)
                .unwrap_or(0),
            paused: !self.is_playing,
        }
    }
}
