//! Fixed-rate frame timing.
//!
//! Every animation sequence is sampled on a fixed grid (60 frames per second
//! for the speech engine). This module converts between frame indices,
//! timestamps, and durations on that grid.

/// Default animation sampling rate of the speech engine.
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// Converts between frame indices and seconds at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    frame_rate: f64,
}

impl FrameClock {
    /// Create a clock ticking at `frame_rate` frames per second.
    ///
    /// Non-finite or non-positive rates fall back to [`DEFAULT_FRAME_RATE`].
    pub fn new(frame_rate: f64) -> Self {
        let frame_rate = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            DEFAULT_FRAME_RATE
        };
        Self { frame_rate }
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Seconds between consecutive frames.
    pub fn step_secs(&self) -> f64 {
        1.0 / self.frame_rate
    }

    /// Timestamp of the frame at `index`.
    ///
    /// Computed from the index rather than accumulated, so long sequences
    /// do not drift.
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 / self.frame_rate
    }

    /// Nearest frame index for a timestamp.
    ///
    /// Returns `None` for negative or non-finite times.
    pub fn index_of(&self, time_secs: f64) -> Option<usize> {
        let position = (time_secs * self.frame_rate).round();
        if position.is_finite() && position >= 0.0 {
            Some(position as usize)
        } else {
            None
        }
    }

    /// Duration covered by `frame_count` frames.
    pub fn duration_of(&self, frame_count: usize) -> f64 {
        frame_count as f64 / self.frame_rate
    }

    /// Number of samples needed to cover `duration_secs`.
    ///
    /// Matches a `for i in 0..duration * rate` sampling loop: a fractional
    /// sample count rounds up.
    pub fn samples_in(&self, duration_secs: f64) -> usize {
        let span = duration_secs * self.frame_rate;
        if span.is_finite() && span > 0.0 {
            span.ceil() as usize
        } else {
            0
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}
