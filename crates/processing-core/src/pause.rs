//! Pause detection: finding spans where the face is at rest.
//!
//! A frame is at rest when no blendshape exceeds the activity threshold. A
//! pause is a maximal run of resting frames lasting at least the minimum
//! pause duration.

use facesync_animation_model::frame::Frame;
use facesync_common::clock::FrameClock;
use serde::{Deserialize, Serialize};

/// Configuration for the pause detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseDetectorConfig {
    /// Weight at or below which a shape counts as at rest.
    pub activity_threshold: f64,

    /// Minimum run duration to report (seconds, inclusive).
    pub min_pause_secs: f64,
}

impl Default for PauseDetectorConfig {
    fn default() -> Self {
        Self {
            activity_threshold: 0.05,
            min_pause_secs: 0.3,
        }
    }
}

/// A run of resting frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pause {
    /// Index of the first resting frame.
    pub start_index: usize,
    /// Index of the last resting frame (inclusive).
    pub end_index: usize,
    /// Run length in seconds.
    pub length_secs: f64,
}

impl Pause {
    pub fn frame_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    /// Timestamp of the first frame of the pause.
    pub fn start_secs(&self, clock: &FrameClock) -> f64 {
        clock.time_of(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }
}

/// Scans a sequence for pauses.
pub struct PauseDetector {
    config: PauseDetectorConfig,
}

impl PauseDetector {
    pub fn new(config: PauseDetectorConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PauseDetectorConfig::default())
    }

    /// Report every qualifying pause in frame order.
    ///
    /// A run still open at the end of the sequence is closed there and
    /// evaluated like any other.
    pub fn detect(&self, frames: &[Frame], clock: &FrameClock) -> Vec<Pause> {
        if frames.len() < 2 {
            return vec![];
        }

        let mut pauses = vec![];
        let mut run_start: Option<usize> = None;

        for (index, frame) in frames.iter().enumerate() {
            let at_rest = frame.is_at_rest(self.config.activity_threshold);
            match (at_rest, run_start) {
                (true, None) => run_start = Some(index),
                (false, Some(start)) => {
                    self.close_run(start, index - 1, clock, &mut pauses);
                    run_start = None;
                }
                _ => {}
            }
        }

        if let Some(start) = run_start {
            self.close_run(start, frames.len() - 1, clock, &mut pauses);
        }

        pauses
    }

    fn close_run(&self, start: usize, end: usize, clock: &FrameClock, pauses: &mut Vec<Pause>) {
        let length_secs = clock.duration_of(end - start + 1);
        if length_secs >= self.config.min_pause_secs {
            pauses.push(Pause {
                start_index: start,
                end_index: end,
                length_secs,
            });
        }
    }
}

/// Convenience wrapper over [`PauseDetector`] with explicit thresholds.
pub fn detect_pauses(
    frames: &[Frame],
    frame_rate: f64,
    activity_threshold: f64,
    min_pause_secs: f64,
) -> Vec<Pause> {
    PauseDetector::new(PauseDetectorConfig {
        activity_threshold,
        min_pause_secs,
    })
    .detect(frames, &FrameClock::new(frame_rate))
}
