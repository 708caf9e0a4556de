//! The timeline payload handed to the render client.

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Response body for one spoken reply: the processed animation timeline plus
/// its audio, either as a fetchable file or inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkResponse {
    /// Final blendshape timeline, one record per frame.
    pub blend_data: Vec<Frame>,

    /// Path of the synthesized audio, when it was written to disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Audio bytes carried in the response itself (streaming replies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_data: Option<Vec<u8>>,
}

impl TalkResponse {
    pub fn new(blend_data: Vec<Frame>) -> Self {
        Self {
            blend_data,
            filename: None,
            audio_data: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_audio_data(mut self, audio_data: Vec<u8>) -> Self {
        self.audio_data = Some(audio_data);
        self
    }

    /// Timeline length in seconds (time of the last frame).
    pub fn duration_secs(&self) -> f64 {
        self.blend_data.last().map(|f| f.time).unwrap_or(0.0)
    }
}
