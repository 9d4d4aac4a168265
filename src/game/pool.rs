//! Track pool loading: catalog abstraction, premium/preview filtering, and the
//! logged fallback onto the built-in mock pool.

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{info, warn};

use crate::game::track::{Track, mock_tracks};

/// Which part of the catalog a pool is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSelector {
    /// The player's most listened tracks.
    TopTracks,
    /// A specific playlist, by catalog identifier.
    Playlist(String),
}

/// Error raised by a catalog backend.
#[derive(Debug, Error)]
#[error("catalog request failed: {0}")]
pub struct CatalogError(pub String);

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Abstraction over the remote catalog service the pool loader queries.
pub trait CatalogClient: Send + Sync {
    /// Fetch the tracks behind `selector`.
    fn tracks(&self, selector: CatalogSelector) -> BoxFuture<'static, CatalogResult<Vec<Track>>>;
}

/// Where the loaded pool came from, so callers can tell live data from the
/// degraded fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSource {
    /// Tracks fetched from the live catalog.
    Live,
    /// Built-in mock tracks; the catalog was unreachable or too small.
    Fallback,
}

/// A pool ready to back a game session, tagged with its origin.
#[derive(Debug, Clone)]
pub struct LoadedPool {
    /// Candidate tracks for the session.
    pub tracks: Vec<Track>,
    /// Origin of the tracks.
    pub source: PoolSource,
}

/// Load the track pool for a game session.
///
/// Premium playback needs no preview audio, so every fetched track is kept.
/// Without premium, tracks lacking a real preview are dropped before the
/// minimum-size check. Any catalog failure, or a result smaller than
/// `option_count`, degrades onto the mock pool; the degradation is logged and
/// surfaced through [`PoolSource::Fallback`].
pub async fn load_tracks(
    catalog: &dyn CatalogClient,
    selector: CatalogSelector,
    has_premium: bool,
    option_count: usize,
) -> LoadedPool {
    match catalog.tracks(selector.clone()).await {
        Ok(fetched) => {
            if has_premium {
                if fetched.len() >= option_count {
                    info!(count = fetched.len(), "using catalog tracks (premium)");
                    return LoadedPool {
                        tracks: fetched,
                        source: PoolSource::Live,
                    };
                }
                warn!(
                    count = fetched.len(),
                    needed = option_count,
                    "catalog returned too few tracks; using mock pool"
                );
            } else {
                let with_preview: Vec<Track> = fetched
                    .into_iter()
                    .filter(Track::has_real_preview)
                    .collect();

                if with_preview.len() >= option_count {
                    info!(count = with_preview.len(), "using catalog tracks with previews");
                    return LoadedPool {
                        tracks: with_preview,
                        source: PoolSource::Live,
                    };
                }
                warn!(
                    count = with_preview.len(),
                    needed = option_count,
                    "too few tracks with previews; using mock pool"
                );
            }
        }
        Err(err) => {
            warn!(selector = ?selector, error = %err, "catalog fetch failed; using mock pool");
        }
    }

    LoadedPool {
        tracks: mock_tracks(),
        source: PoolSource::Fallback,
    }
}
