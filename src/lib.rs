//! Guess-That-Track backend: the music-trivia game core (question generation,
//! track pools, playback-progress reconciliation) plus the OAuth token-exchange
//! proxy it ships with.

pub mod config;
pub mod dto;
pub mod error;
pub mod game;
pub mod playback;
pub mod routes;
pub mod services;
pub mod spotify;
pub mod state;
