//! Progress tracking for the non-premium path, where a local audio engine
//! plays the preview file and pushes position updates itself.
//!
//! The local engine's callback is trusted to terminate deterministically when
//! the preview window elapses, so none of the stall or null-sample detection
//! from the polling reconciler applies here.

/// What a pushed position update resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTick {
    /// Progress through the preview window, 0–100.
    pub progress_percent: u8,
    /// The preview window has elapsed; playback should stop.
    pub finished: bool,
}

/// Progress state for one preview playback.
#[derive(Debug)]
pub struct PreviewProgress {
    preview_length_ms: u64,
    progress_percent: u8,
    finished: bool,
}

impl PreviewProgress {
    /// Track progress against a preview window of `preview_length_ms`.
    pub fn new(preview_length_ms: u64) -> Self {
        Self {
            preview_length_ms,
            progress_percent: 0,
            finished: false,
        }
    }

    /// Apply a position update pushed by the local audio engine.
    pub fn on_position(&mut self, position_ms: u64) -> PreviewTick {
        if !self.finished {
            self.progress_percent = if self.preview_length_ms == 0 {
                100
            } else {
                ((position_ms.saturating_mul(100)) / self.preview_length_ms).min(100) as u8
            };
            self.finished = position_ms >= self.preview_length_ms;
        }

        PreviewTick {
            progress_percent: self.progress_percent,
            finished: self.finished,
        }
    }

    /// Last derived progress percentage.
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_follows_the_preview_window() {
        let mut preview = PreviewProgress::new(30_000);

        assert_eq!(
            preview.on_position(7_500),
            PreviewTick {
                progress_percent: 25,
                finished: false
            }
        );
        assert_eq!(preview.on_position(15_000).progress_percent, 50);
        assert!(!preview.on_position(29_999).finished);
    }

    #[test]
    fn reaching_the_window_end_finishes_playback() {
        let mut preview = PreviewProgress::new(30_000);
        let tick = preview.on_position(30_000);
        assert!(tick.finished);
        assert_eq!(tick.progress_percent, 100);

        // Late updates after the cutoff change nothing.
        let tick = preview.on_position(31_000);
        assert!(tick.finished);
        assert_eq!(tick.progress_percent, 100);
    }

    #[test]
    fn percentage_is_capped() {
        let mut preview = PreviewProgress::new(30_000);
        assert_eq!(preview.on_position(90_000).progress_percent, 100);
    }
}
