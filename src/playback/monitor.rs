//! Timer-driven polling loop that feeds the reconciler and publishes progress.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::playback::reconciler::{Reconciler, ReconcilerConfig, StopReason};
use crate::playback::remote::{PlaybackResult, RemotePlayer};

/// Progress snapshot published after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Progress through the track, 0–100.
    pub percent: u8,
    /// Track length to display (remote-reported once learned).
    pub duration_ms: u64,
    /// Whether the track is still considered playing.
    pub playing: bool,
    /// Why polling ended, once it has.
    pub stopped: Option<StopReason>,
}

impl ProgressUpdate {
    fn initial(config: &ReconcilerConfig) -> Self {
        Self {
            percent: 0,
            duration_ms: config.fallback_duration_ms,
            playing: true,
            stopped: None,
        }
    }
}

/// Watches one track from play command to stop. Owns its reconciler and timer;
/// build a new monitor for every round.
pub struct PlaybackMonitor {
    task: JoinHandle<()>,
    cancel: watch::Sender<bool>,
    progress: watch::Receiver<ProgressUpdate>,
}

impl PlaybackMonitor {
    /// Issue the play command for `track_uri` and start polling on success.
    pub async fn start(
        player: Arc<dyn RemotePlayer>,
        track_uri: String,
        config: ReconcilerConfig,
    ) -> PlaybackResult<Self> {
        player.play_track(track_uri).await?;

        let (progress_tx, progress_rx) = watch::channel(ProgressUpdate::initial(&config));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let mut reconciler = Reconciler::new(config);
        reconciler.start();

        let task = tokio::spawn(poll_loop(player, reconciler, progress_tx, cancel_rx));

        Ok(Self {
            task,
            cancel: cancel_tx,
            progress: progress_rx,
        })
    }

    /// Receiver for progress snapshots; `watch` keeps only the latest value.
    pub fn progress(&self) -> watch::Receiver<ProgressUpdate> {
        self.progress.clone()
    }

    /// Cancel polling (answer submitted or teardown) and wait for the loop to
    /// finish its best-effort pause.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        if let Err(err) = self.task.await {
            warn!(error = %err, "playback monitor task failed");
        }
    }
}

/// One tick's worth of reconciliation per interval; a new tick is only
/// scheduled after the previous one completes, so ticks never overlap.
async fn poll_loop(
    player: Arc<dyn RemotePlayer>,
    mut reconciler: Reconciler,
    progress_tx: watch::Sender<ProgressUpdate>,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval(reconciler.config().tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = cancel_rx.changed() => {
                if changed.is_err() || *cancel_rx.borrow() {
                    if reconciler.cancel() {
                        best_effort_pause(player.as_ref(), "round teardown").await;
                    }
                    publish(&progress_tx, &reconciler, Some(StopReason::Cancelled));
                    return;
                }
            }
            _ = ticker.tick() => {
                let sample = match player.playback_state().await {
                    Ok(sample) => sample,
                    Err(err) => {
                        // A failed query counts the same as an empty one.
                        debug!(error = %err, "playback state query failed");
                        None
                    }
                };

                let outcome = reconciler.observe(sample);
                if outcome.request_pause {
                    best_effort_pause(player.as_ref(), "track finished or frozen").await;
                }
                publish(&progress_tx, &reconciler, outcome.stopped);

                if outcome.stopped.is_some() {
                    return;
                }
            }
        }
    }
}

fn publish(
    progress_tx: &watch::Sender<ProgressUpdate>,
    reconciler: &Reconciler,
    stopped: Option<StopReason>,
) {
    let update = ProgressUpdate {
        percent: reconciler.progress_percent(),
        duration_ms: reconciler.display_duration_ms(),
        playing: stopped.is_none(),
        stopped,
    };
    let _ = progress_tx.send(update);
}

/// Pause failures are logged and swallowed; the next round re-commands the
/// player anyway, so correctness never depends on this call succeeding.
async fn best_effort_pause(player: &dyn RemotePlayer, context: &str) {
    if let Err(err) = player.pause().await {
        warn!(context, error = %err, "pause command failed");
    }
}
