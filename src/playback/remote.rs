//! Seam between the reconciler and whatever controls the remote player.

use futures::future::BoxFuture;
use thiserror::Error;

/// One reading of the remote player's state at a polling tick. Ephemeral;
/// only the reconciler's counters survive between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSample {
    /// Playhead position in milliseconds.
    pub position_ms: u64,
    /// Track length in milliseconds; `0` when the player has not reported it yet.
    pub duration_ms: u64,
    /// Whether the player reports itself paused.
    pub paused: bool,
}

/// Errors raised by remote player commands.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The remote service rejected the command.
    #[error("player command rejected ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the remote service.
        status: u16,
        /// Upstream error detail.
        message: String,
    },
    /// The command never reached the remote service.
    #[error("player unreachable: {0}")]
    Unreachable(String),
    /// No playback device is available to command.
    #[error("no active playback device")]
    NoDevice,
}

/// Result alias for player commands.
pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Remote player capabilities the progress monitor depends on.
pub trait RemotePlayer: Send + Sync {
    /// Start playing `track_uri` from the beginning.
    fn play_track(&self, track_uri: String) -> BoxFuture<'static, PlaybackResult<()>>;

    /// Pause playback. Best effort; callers log and swallow failures.
    fn pause(&self) -> BoxFuture<'static, PlaybackResult<()>>;

    /// Sample the current playback state. `None` means the player reported
    /// nothing, which the reconciler times out rather than trusting forever.
    fn playback_state(&self) -> BoxFuture<'static, PlaybackResult<Option<PlaybackSample>>>;
}
