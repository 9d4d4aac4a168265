//! Playback-state reconciliation: polling the remote player, deriving a
//! progress percentage, and detecting stalled/ended/lost playback.

pub mod monitor;
pub mod preview;
pub mod reconciler;
pub mod remote;

pub use monitor::{PlaybackMonitor, ProgressUpdate};
pub use preview::PreviewProgress;
pub use reconciler::{Reconciler, ReconcilerConfig, ReconcilerPhase, StopReason};
pub use remote::{PlaybackError, PlaybackSample, RemotePlayer};
