//! Spotify Web API bindings: catalog queries and remote playback control.

pub mod client;
pub mod models;

pub use client::{SpotifyApiError, SpotifyClient};
