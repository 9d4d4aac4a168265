//! Reconciles raw remote playback samples into UI-facing progress state.
//!
//! Pure per-tick state machine; the async polling loop lives in
//! [`crate::playback::monitor`]. The remote SDK is observed to omit the track
//! duration on the first samples after a play command, and to sometimes stop
//! emitting state entirely without an "ended" event. Both are degraded-signal
//! conditions that are timed out rather than trusted indefinitely, hence the
//! two independent tick counters.

use std::time::Duration;

use crate::playback::remote::PlaybackSample;

/// Thresholds driving the reconciler, defaulted to the observed values.
#[derive(Debug, Clone, Copy)]
pub struct ReconcilerConfig {
    /// Interval between remote state samples.
    pub tick_interval: Duration,
    /// Position movement below this is considered "not advancing".
    pub stall_delta_ms: u64,
    /// Consecutive non-advancing ticks before playback counts as frozen.
    pub stall_tick_limit: u32,
    /// Consecutive null samples before the player counts as disconnected.
    pub null_tick_limit: u32,
    /// Duration used for progress while the player has not reported one
    /// (the preview length).
    pub fallback_duration_ms: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            stall_delta_ms: 50,
            stall_tick_limit: 30,
            null_tick_limit: 20,
            fallback_duration_ms: 30_000,
        }
    }
}

/// Why the reconciler stopped watching the current track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The playhead reached the reported track length.
    TrackEnded,
    /// The remote player reported itself paused. While the duration is still
    /// unknown this also covers a completed track; the two cannot be told
    /// apart in that branch.
    RemotePaused,
    /// The position stopped advancing despite playback reportedly active.
    Stalled,
    /// The player stopped reporting state altogether.
    ConnectionLost,
    /// The round ended locally (answer submitted or teardown).
    Cancelled,
}

/// Lifecycle of one reconciler instance. `Stopped` is terminal for the
/// current track; a new round builds a fresh reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilerPhase {
    /// Play command not yet confirmed.
    Idle,
    /// Sampling the remote player every tick.
    Polling,
    /// Done with this track.
    Stopped(StopReason),
}

/// What one tick decided: the progress to display, whether a pause command
/// should be issued, and whether polling is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Progress through the track, 0–100.
    pub progress_percent: u8,
    /// The caller should issue a (best-effort) pause command.
    pub request_pause: bool,
    /// Set when this tick ended polling.
    pub stopped: Option<StopReason>,
}

/// Per-track progress state machine. Counters are exclusively owned by the
/// instance and start fresh with every round.
#[derive(Debug)]
pub struct Reconciler {
    config: ReconcilerConfig,
    phase: ReconcilerPhase,
    progress_percent: u8,
    known_duration_ms: Option<u64>,
    last_position_ms: Option<u64>,
    stall_ticks: u32,
    null_ticks: u32,
}

impl Reconciler {
    /// Build an idle reconciler with the given thresholds.
    pub fn new(config: ReconcilerConfig) -> Self {
        Self {
            config,
            phase: ReconcilerPhase::Idle,
            progress_percent: 0,
            known_duration_ms: None,
            last_position_ms: None,
            stall_ticks: 0,
            null_ticks: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ReconcilerPhase {
        self.phase
    }

    /// Thresholds this reconciler runs with.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Last derived progress percentage.
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Track length to display: the remote-reported duration once learned,
    /// the fallback preview length until then.
    pub fn display_duration_ms(&self) -> u64 {
        self.known_duration_ms
            .unwrap_or(self.config.fallback_duration_ms)
    }

    /// Confirm the play command was issued and begin polling.
    pub fn start(&mut self) {
        if self.phase == ReconcilerPhase::Idle {
            self.phase = ReconcilerPhase::Polling;
        }
    }

    /// End polling because the round ended locally. Returns `true` when a
    /// best-effort pause should be issued (i.e. polling was actually active).
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            ReconcilerPhase::Idle => {
                self.phase = ReconcilerPhase::Stopped(StopReason::Cancelled);
                false
            }
            ReconcilerPhase::Polling => {
                self.phase = ReconcilerPhase::Stopped(StopReason::Cancelled);
                true
            }
            ReconcilerPhase::Stopped(_) => false,
        }
    }

    /// Feed one polling tick's sample through the machine.
    pub fn observe(&mut self, sample: Option<PlaybackSample>) -> TickOutcome {
        if self.phase != ReconcilerPhase::Polling {
            return self.outcome(false, None);
        }

        let Some(sample) = sample else {
            self.null_ticks += 1;
            if self.null_ticks >= self.config.null_tick_limit {
                // The device went away silently; a pause command has nothing
                // left to act on.
                return self.stop(StopReason::ConnectionLost, false);
            }
            return self.outcome(false, None);
        };

        self.null_ticks = 0;

        if sample.duration_ms > 0 {
            // Remote duration is authoritative from the first sample carrying it.
            self.known_duration_ms = Some(sample.duration_ms);
            self.progress_percent = percent(sample.position_ms, sample.duration_ms);

            if sample.position_ms >= sample.duration_ms {
                return self.stop(StopReason::TrackEnded, !sample.paused);
            }
            if sample.paused {
                return self.stop(StopReason::RemotePaused, false);
            }
        } else {
            self.progress_percent = percent(sample.position_ms, self.config.fallback_duration_ms);

            if sample.paused {
                // Duration was never learned, so "ended" cannot be told apart
                // from "paused"; stop either way.
                return self.stop(StopReason::RemotePaused, false);
            }
        }

        self.detect_stall(sample.position_ms)
    }

    fn detect_stall(&mut self, position_ms: u64) -> TickOutcome {
        if let Some(last) = self.last_position_ms {
            if position_ms.abs_diff(last) < self.config.stall_delta_ms {
                self.stall_ticks += 1;
                if self.stall_ticks >= self.config.stall_tick_limit {
                    return self.stop(StopReason::Stalled, true);
                }
                return self.outcome(false, None);
            }
        }

        self.last_position_ms = Some(position_ms);
        self.stall_ticks = 0;
        self.outcome(false, None)
    }

    fn stop(&mut self, reason: StopReason, request_pause: bool) -> TickOutcome {
        self.phase = ReconcilerPhase::Stopped(reason);
        self.outcome(request_pause, Some(reason))
    }

    fn outcome(&self, request_pause: bool, stopped: Option<StopReason>) -> TickOutcome {
        TickOutcome {
            progress_percent: self.progress_percent,
            request_pause,
            stopped,
        }
    }
}

/// Position over duration as a whole percentage, capped at 100.
fn percent(position_ms: u64, duration_ms: u64) -> u8 {
    if duration_ms == 0 {
        return 0;
    }
    ((position_ms.saturating_mul(100)) / duration_ms).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polling(config: ReconcilerConfig) -> Reconciler {
        let mut reconciler = Reconciler::new(config);
        reconciler.start();
        reconciler
    }

    fn sample(position_ms: u64, duration_ms: u64, paused: bool) -> Option<PlaybackSample> {
        Some(PlaybackSample {
            position_ms,
            duration_ms,
            paused,
        })
    }

    #[test]
    fn idle_until_started() {
        let mut reconciler = Reconciler::new(ReconcilerConfig::default());
        assert_eq!(reconciler.phase(), ReconcilerPhase::Idle);

        // Samples are ignored until the play command is confirmed.
        let outcome = reconciler.observe(sample(1_000, 200_000, false));
        assert_eq!(outcome.progress_percent, 0);
        assert_eq!(reconciler.phase(), ReconcilerPhase::Idle);
    }

    #[test]
    fn progress_tracks_reported_duration() {
        let mut reconciler = polling(ReconcilerConfig::default());

        let outcome = reconciler.observe(sample(30_000, 200_000, false));
        assert_eq!(outcome.progress_percent, 15);
        assert!(outcome.stopped.is_none());
        assert_eq!(reconciler.display_duration_ms(), 200_000);
    }

    #[test]
    fn position_reaching_duration_stops_with_one_pause() {
        let mut reconciler = polling(ReconcilerConfig::default());

        // Position advances monotonically to >= duration.
        let mut pauses = 0;
        for position in [50_000u64, 120_000, 190_000, 200_000] {
            let outcome = reconciler.observe(sample(position, 200_000, false));
            if outcome.request_pause {
                pauses += 1;
            }
        }

        assert_eq!(reconciler.phase(), ReconcilerPhase::Stopped(StopReason::TrackEnded));
        assert_eq!(reconciler.progress_percent(), 100);
        assert_eq!(pauses, 1);

        // Terminal: further samples change nothing.
        let outcome = reconciler.observe(sample(210_000, 200_000, false));
        assert!(!outcome.request_pause);
        assert!(outcome.stopped.is_none());
    }

    #[test]
    fn remote_pause_with_known_duration_stops_without_repausing() {
        let mut reconciler = polling(ReconcilerConfig::default());
        reconciler.observe(sample(10_000, 200_000, false));

        let outcome = reconciler.observe(sample(10_500, 200_000, true));
        assert!(!outcome.request_pause, "already paused remotely");
        assert_eq!(outcome.stopped, Some(StopReason::RemotePaused));
    }

    #[test]
    fn stall_pauses_and_stops_after_the_configured_run() {
        let config = ReconcilerConfig::default();
        let mut reconciler = polling(config);

        reconciler.observe(sample(5_000, 200_000, false));

        // Position frozen (delta below 50 ms) while reportedly playing.
        let mut pauses = 0;
        let mut stopped = None;
        for _ in 0..config.stall_tick_limit {
            let outcome = reconciler.observe(sample(5_010, 200_000, false));
            if outcome.request_pause {
                pauses += 1;
            }
            if outcome.stopped.is_some() {
                stopped = outcome.stopped;
                break;
            }
        }

        assert_eq!(stopped, Some(StopReason::Stalled));
        assert_eq!(pauses, 1);
    }

    #[test]
    fn advancing_position_resets_the_stall_counter() {
        let config = ReconcilerConfig::default();
        let mut reconciler = polling(config);

        reconciler.observe(sample(5_000, 200_000, false));
        for _ in 0..(config.stall_tick_limit - 1) {
            reconciler.observe(sample(5_010, 200_000, false));
        }

        // A real jump resets the run; the next freeze needs a full run again.
        reconciler.observe(sample(8_000, 200_000, false));
        let outcome = reconciler.observe(sample(8_020, 200_000, false));
        assert!(outcome.stopped.is_none());
        assert_eq!(reconciler.phase(), ReconcilerPhase::Polling);
    }

    #[test]
    fn null_samples_time_out_without_a_pause() {
        let config = ReconcilerConfig::default();
        let mut reconciler = polling(config);

        let mut outcome = reconciler.observe(None);
        for _ in 1..config.null_tick_limit {
            assert!(outcome.stopped.is_none());
            outcome = reconciler.observe(None);
        }

        assert_eq!(outcome.stopped, Some(StopReason::ConnectionLost));
        assert!(!outcome.request_pause, "device already gone");
    }

    #[test]
    fn a_real_sample_resets_the_null_counter() {
        let config = ReconcilerConfig::default();
        let mut reconciler = polling(config);

        for _ in 0..(config.null_tick_limit - 1) {
            reconciler.observe(None);
        }
        reconciler.observe(sample(1_000, 200_000, false));

        for _ in 0..(config.null_tick_limit - 1) {
            let outcome = reconciler.observe(None);
            assert!(outcome.stopped.is_none());
        }
    }

    #[test]
    fn unknown_duration_uses_the_fallback_length() {
        let mut reconciler = polling(ReconcilerConfig::default());

        let outcome = reconciler.observe(sample(15_000, 0, false));
        // 15 s into the 30 s preview window.
        assert_eq!(outcome.progress_percent, 50);
        assert_eq!(reconciler.display_duration_ms(), 30_000);
    }

    #[test]
    fn pause_without_duration_is_indistinguishable_from_end() {
        // Known ambiguity carried over from the observed behaviour: while the
        // duration was never reported, a remote "paused" flag may equally mean
        // the track completed. The reconciler stops with RemotePaused either way.
        let mut reconciler = polling(ReconcilerConfig::default());
        reconciler.observe(sample(29_000, 0, false));

        let outcome = reconciler.observe(sample(30_000, 0, true));
        assert_eq!(outcome.stopped, Some(StopReason::RemotePaused));
        assert!(!outcome.request_pause);
    }

    #[test]
    fn cancel_requests_a_pause_only_while_polling() {
        let mut idle = Reconciler::new(ReconcilerConfig::default());
        assert!(!idle.cancel());
        assert_eq!(idle.phase(), ReconcilerPhase::Stopped(StopReason::Cancelled));

        let mut active = polling(ReconcilerConfig::default());
        assert!(active.cancel());
        assert_eq!(active.phase(), ReconcilerPhase::Stopped(StopReason::Cancelled));

        // Cancelling a stopped reconciler is a no-op.
        assert!(!active.cancel());
    }

    #[test]
    fn progress_is_capped_at_100() {
        let mut reconciler = polling(ReconcilerConfig::default());
        let outcome = reconciler.observe(sample(250_000, 200_000, false));
        assert_eq!(outcome.progress_percent, 100);
    }
}
