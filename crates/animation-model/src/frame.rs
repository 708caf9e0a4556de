//! Timestamped blendshape frames.

use std::collections::BTreeMap;

use facesync_common::error::{FacesyncError, FacesyncResult};
use serde::{Deserialize, Serialize};

/// Blendshape name to weight. Sorted so serialized output is stable.
pub type BlendshapeWeights = BTreeMap<String, f64>;

/// An ordered, strictly time-increasing list of frames from one synthesis call.
pub type Sequence = Vec<Frame>;

/// A snapshot of every blendshape weight at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Seconds since the start of the utterance.
    pub time: f64,

    /// Weight per blendshape, nominally in `[0.0, 1.0]`.
    pub blendshapes: BlendshapeWeights,
}

impl Frame {
    pub fn new(time: f64, blendshapes: BlendshapeWeights) -> Self {
        Self { time, blendshapes }
    }

    /// A frame with every named shape at rest.
    pub fn neutral<S: AsRef<str>>(time: f64, names: &[S]) -> Self {
        let blendshapes = names
            .iter()
            .map(|name| (name.as_ref().to_string(), 0.0))
            .collect();
        Self { time, blendshapes }
    }

    /// Builder-style weight assignment.
    pub fn with_weight(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.blendshapes.insert(name.into(), weight);
        self
    }

    pub fn weight(&self, name: &str) -> Option<f64> {
        self.blendshapes.get(name).copied()
    }

    /// Largest weight in the frame, or `None` for a frame with no shapes.
    pub fn peak_weight(&self) -> Option<f64> {
        self.blendshapes.values().copied().reduce(f64::max)
    }

    /// Whether no shape exceeds `threshold`. An empty frame is at rest.
    pub fn is_at_rest(&self, threshold: f64) -> bool {
        self.blendshapes.values().all(|&w| w <= threshold)
    }
}

/// Check the sequence invariants: strictly increasing, non-negative time and
/// one shared shape set across every frame.
pub fn validate_sequence(frames: &[Frame]) -> FacesyncResult<()> {
    let Some(first) = frames.first() else {
        return Ok(());
    };

    if !(first.time >= 0.0) {
        return Err(FacesyncError::invalid_frame(format!(
            "frame 0 has invalid time {}",
            first.time
        )));
    }

    for (index, pair) in frames.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        if !(curr.time > prev.time) {
            return Err(FacesyncError::invalid_frame(format!(
                "frame {} at {}s does not follow frame {} at {}s",
                index + 1,
                curr.time,
                index,
                prev.time
            )));
        }
        if !curr.blendshapes.keys().eq(first.blendshapes.keys()) {
            return Err(FacesyncError::invalid_frame(format!(
                "frame {} has a different blendshape set than frame 0",
                index + 1
            )));
        }
    }

    Ok(())
}
