//! Spotify Web API client backing the catalog and remote-player seams.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::game::pool::{CatalogClient, CatalogError, CatalogResult, CatalogSelector};
use crate::game::track::Track;
use crate::playback::remote::{PlaybackError, PlaybackResult, PlaybackSample, RemotePlayer};
use crate::spotify::models::{PlayerState, PlaylistResponse, TopTracksResponse, UserProfile};

/// Default Web API origin; overridable for tests.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com";

/// Attempts for the play command and the device-activation handshake.
/// The Web API answers 404 while a freshly registered device is not yet
/// addressable, so both are retried a fixed small number of times.
const COMMAND_RETRY_ATTEMPTS: u32 = 3;
/// Delay between play-command attempts.
const PLAY_RETRY_DELAY: Duration = Duration::from_millis(1000);
/// Delay between device-activation attempts.
const ACTIVATION_RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Errors raised by Web API calls.
#[derive(Debug, Error)]
pub enum SpotifyApiError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build http client")]
    ClientBuilder {
        /// Builder failure.
        source: reqwest::Error,
    },
    /// The request never reached the API.
    #[error("request to `{path}` failed")]
    RequestSend {
        /// Requested path.
        path: String,
        /// Transport failure.
        source: reqwest::Error,
    },
    /// The API answered with a non-success status.
    #[error("request to `{path}` returned {status}")]
    RequestStatus {
        /// Requested path.
        path: String,
        /// Returned status.
        status: StatusCode,
    },
    /// The response body could not be decoded.
    #[error("failed to decode response from `{path}`")]
    DecodeResponse {
        /// Requested path.
        path: String,
        /// Decode failure.
        source: reqwest::Error,
    },
}

impl From<SpotifyApiError> for CatalogError {
    fn from(err: SpotifyApiError) -> Self {
        CatalogError(err.to_string())
    }
}

impl From<SpotifyApiError> for PlaybackError {
    fn from(err: SpotifyApiError) -> Self {
        match err {
            SpotifyApiError::RequestStatus {
                status: StatusCode::NOT_FOUND,
                ..
            } => PlaybackError::NoDevice,
            SpotifyApiError::RequestStatus { status, path } => PlaybackError::Rejected {
                status: status.as_u16(),
                message: format!("`{path}` rejected"),
            },
            other => PlaybackError::Unreachable(other.to_string()),
        }
    }
}

/// Authenticated Web API client. Implements [`CatalogClient`] for pool loading
/// and [`RemotePlayer`] for playback control and polling.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Client,
    base_url: Arc<str>,
    access_token: Arc<str>,
    device_id: Option<Arc<str>>,
}

impl SpotifyClient {
    /// Build a client talking to the default API origin.
    pub fn new(access_token: &str) -> Result<Self, SpotifyApiError> {
        Self::with_base_url(access_token, DEFAULT_API_BASE_URL)
    }

    /// Build a client against a specific API origin.
    pub fn with_base_url(access_token: &str, base_url: &str) -> Result<Self, SpotifyApiError> {
        let client = Client::builder()
            .build()
            .map_err(|source| SpotifyApiError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            access_token: Arc::from(access_token),
            device_id: None,
        })
    }

    /// Run the device-activation handshake for `device_id` and bind subsequent
    /// play commands to it. Activation failures after the retry budget are
    /// logged and swallowed; the play command itself retries against the
    /// device anyway.
    pub async fn connect_device(mut self, device_id: String) -> Self {
        match self.transfer_playback(&device_id).await {
            Ok(()) => info!(%device_id, "playback device activated"),
            Err(err) => warn!(%device_id, error = %err, "device activation failed"),
        }
        self.device_id = Some(Arc::from(device_id.as_str()));
        self
    }

    /// Whether the account supports full-track remote playback.
    pub async fn has_premium(&self) -> Result<bool, SpotifyApiError> {
        let profile: UserProfile = self.get_json("v1/me").await?;
        Ok(profile.product.as_deref() == Some("premium"))
    }

    /// Tracks of a playlist, skipping removed and id-less entries.
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, SpotifyApiError> {
        let path = format!("v1/playlists/{playlist_id}");
        let playlist: PlaylistResponse = self.get_json(&path).await?;
        Ok(playlist
            .tracks
            .map(|page| {
                page.items
                    .into_iter()
                    .filter_map(|item| item.track)
                    .filter_map(|track| track.into_track())
                    .collect()
            })
            .unwrap_or_default())
    }

    /// The user's medium-term top tracks.
    pub async fn top_tracks(&self) -> Result<Vec<Track>, SpotifyApiError> {
        let listing: TopTracksResponse = self
            .get_json("v1/me/top/tracks?time_range=medium_term&limit=50")
            .await?;
        Ok(listing
            .items
            .into_iter()
            .filter_map(|track| track.into_track())
            .collect())
    }

    /// Transfer playback onto `device_id` without starting anything, retrying
    /// while the device is not yet addressable (404).
    async fn transfer_playback(&self, device_id: &str) -> Result<(), SpotifyApiError> {
        let body = json!({ "device_ids": [device_id], "play": false });

        let mut attempt = 1;
        loop {
            match self.send_command(Method::PUT, "v1/me/player", Some(&body)).await {
                Ok(()) => return Ok(()),
                Err(SpotifyApiError::RequestStatus {
                    status: StatusCode::NOT_FOUND,
                    ..
                }) if attempt < COMMAND_RETRY_ATTEMPTS => {
                    debug!(attempt, "device not found yet; retrying activation");
                    sleep(ACTIVATION_RETRY_DELAY).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn start_playback(&self, track_uri: &str) -> Result<(), SpotifyApiError> {
        let path = match &self.device_id {
            Some(device_id) => format!("v1/me/player/play?device_id={device_id}"),
            None => "v1/me/player/play".into(),
        };
        let body = json!({ "uris": [track_uri], "position_ms": 0 });

        let mut attempt = 1;
        loop {
            match self.send_command(Method::PUT, &path, Some(&body)).await {
                Ok(()) => return Ok(()),
                Err(SpotifyApiError::RequestStatus {
                    status: StatusCode::NOT_FOUND,
                    ..
                }) if attempt < COMMAND_RETRY_ATTEMPTS => {
                    debug!(attempt, "device not ready for playback; retrying");
                    sleep(PLAY_RETRY_DELAY).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn pause_playback(&self) -> Result<(), SpotifyApiError> {
        self.send_command(Method::PUT, "v1/me/player/pause", None)
            .await
    }

    /// Sample the player; `204 No Content` means the player reported nothing.
    async fn current_playback(&self) -> Result<Option<PlaybackSample>, SpotifyApiError> {
        const PATH: &str = "v1/me/player";
        let response = self
            .request(Method::GET, PATH)
            .send()
            .await
            .map_err(|source| SpotifyApiError::RequestSend {
                path: PATH.into(),
                source,
            })?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => {
                let state: PlayerState =
                    response
                        .json()
                        .await
                        .map_err(|source| SpotifyApiError::DecodeResponse {
                            path: PATH.into(),
                            source,
                        })?;
                Ok(Some(state.into_sample()))
            }
            status => Err(SpotifyApiError::RequestStatus {
                path: PATH.into(),
                status,
            }),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client
            .request(method, url)
            .bearer_auth(self.access_token.as_ref())
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, SpotifyApiError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|source| SpotifyApiError::RequestSend {
                path: path.into(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpotifyApiError::RequestStatus {
                path: path.into(),
                status,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| SpotifyApiError::DecodeResponse {
                path: path.into(),
                source,
            })
    }

    /// Issue a player command; the API acknowledges with 200 or 204.
    async fn send_command(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(), SpotifyApiError> {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| SpotifyApiError::RequestSend {
                path: path.into(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SpotifyApiError::RequestStatus {
                path: path.into(),
                status,
            })
        }
    }
}

impl CatalogClient for SpotifyClient {
    fn tracks(&self, selector: CatalogSelector) -> BoxFuture<'static, CatalogResult<Vec<Track>>> {
        let client = self.clone();
        Box::pin(async move {
            let tracks = match selector {
                CatalogSelector::TopTracks => client.top_tracks().await?,
                CatalogSelector::Playlist(id) => client.playlist_tracks(&id).await?,
            };
            Ok(tracks)
        })
    }
}

impl RemotePlayer for SpotifyClient {
    fn play_track(&self, track_uri: String) -> BoxFuture<'static, PlaybackResult<()>> {
        let client = self.clone();
        Box::pin(async move { client.start_playback(&track_uri).await.map_err(Into::into) })
    }

    fn pause(&self) -> BoxFuture<'static, PlaybackResult<()>> {
        let client = self.clone();
        Box::pin(async move { client.pause_playback().await.map_err(Into::into) })
    }

    fn playback_state(&self) -> BoxFuture<'static, PlaybackResult<Option<PlaybackSample>>> {
        let client = self.clone();
        Box::pin(async move { client.current_playback().await.map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_maps_to_no_device() {
        let err = SpotifyApiError::RequestStatus {
            path: "v1/me/player/play".into(),
            status: StatusCode::NOT_FOUND,
        };
        assert!(matches!(PlaybackError::from(err), PlaybackError::NoDevice));
    }

    #[test]
    fn other_statuses_map_to_rejections() {
        let err = SpotifyApiError::RequestStatus {
            path: "v1/me/player/pause".into(),
            status: StatusCode::FORBIDDEN,
        };
        match PlaybackError::from(err) {
            PlaybackError::Rejected { status, .. } => assert_eq!(status, 403),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = SpotifyClient::with_base_url("token", "https://api.example.test/").unwrap();
        assert_eq!(client.base_url.as_ref(), "https://api.example.test");
    }

    #[test]
    fn client_slots_behind_both_seams() {
        let client = SpotifyClient::with_base_url("token", "https://api.example.test").unwrap();
        let _catalog: Arc<dyn CatalogClient> = Arc::new(client.clone());
        let _player: Arc<dyn RemotePlayer> = Arc::new(client);
    }
}
