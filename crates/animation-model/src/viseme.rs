//! Raw viseme events from the speech engine.
//!
//! The engine emits one event per viseme. Each event carries a block of
//! sub-frames sampled at 60 fps, where every row is a bare weight array
//! keyed by position against the [`BlendshapeVocabulary`]. Recordings of
//! these events are stored as JSONL (one event per line).

use facesync_common::clock::FrameClock;
use facesync_common::error::{FacesyncError, FacesyncResult};
use serde::{Deserialize, Serialize};

use crate::blendshape::BlendshapeVocabulary;
use crate::frame::{Frame, Sequence};

/// Engine audio offsets are expressed in 100-nanosecond ticks.
pub const TICKS_PER_SECOND: f64 = 10_000_000.0;

/// A single viseme event as delivered by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisemeEvent {
    /// Audio position of the viseme in 100ns ticks.
    #[serde(default)]
    pub audio_offset_ticks: u64,

    /// Engine viseme identifier.
    #[serde(default)]
    pub viseme_id: u32,

    /// Blendshape animation block.
    #[serde(default)]
    pub animation: VisemeAnimation,
}

/// The blendshape payload of one viseme event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisemeAnimation {
    /// Index of the first sub-frame in the engine's own numbering.
    #[serde(rename = "FrameIndex", default)]
    pub frame_index: u64,

    /// Sub-frame weight rows.
    #[serde(rename = "BlendShapes", default)]
    pub blend_shapes: Vec<Vec<f64>>,
}

impl VisemeEvent {
    /// Build an event from the engine's callback fields.
    ///
    /// The engine hands the animation block over as a JSON string, which is
    /// empty for visemes that carry no facial data.
    pub fn from_engine(
        audio_offset_ticks: u64,
        viseme_id: u32,
        animation_json: &str,
    ) -> FacesyncResult<Self> {
        let animation = if animation_json.trim().is_empty() {
            VisemeAnimation::default()
        } else {
            serde_json::from_str(animation_json)?
        };
        Ok(Self {
            audio_offset_ticks,
            viseme_id,
            animation,
        })
    }

    /// Audio position in seconds.
    pub fn audio_offset_secs(&self) -> f64 {
        self.audio_offset_ticks as f64 / TICKS_PER_SECOND
    }

    /// Number of sub-frames in this event.
    pub fn row_count(&self) -> usize {
        self.animation.blend_shapes.len()
    }
}

/// Parse events from JSONL content (one JSON object per line).
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_viseme_events(jsonl: &str) -> Result<Vec<VisemeEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_viseme_events(events: &[VisemeEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

/// Expand viseme events into a fixed-rate frame sequence.
///
/// Rows are laid end to end in event order; each gets the next slot on the
/// clock's grid starting at zero. A row whose length differs from the
/// vocabulary is rejected.
pub fn materialize_frames(
    events: &[VisemeEvent],
    vocabulary: &BlendshapeVocabulary,
    clock: &FrameClock,
) -> FacesyncResult<Sequence> {
    let total_rows: usize = events.iter().map(VisemeEvent::row_count).sum();
    let mut frames = Vec::with_capacity(total_rows);

    for (event_index, event) in events.iter().enumerate() {
        for (row_index, row) in event.animation.blend_shapes.iter().enumerate() {
            if row.len() != vocabulary.len() {
                return Err(FacesyncError::invalid_frame(format!(
                    "viseme event {event_index} row {row_index} has {} weights, expected {}",
                    row.len(),
                    vocabulary.len()
                )));
            }

            let blendshapes = vocabulary
                .names()
                .iter()
                .cloned()
                .zip(row.iter().copied())
                .collect();
            frames.push(Frame::new(clock.time_of(frames.len()), blendshapes));
        }
    }

    tracing::debug!(
        events = events.len(),
        frames = frames.len(),
        "Materialized viseme frames"
    );

    Ok(frames)
}
