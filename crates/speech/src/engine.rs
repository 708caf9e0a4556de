//! The speech engine trait and the channel it reports visemes through.

use std::future::Future;

use facesync_animation_model::viseme::VisemeEvent;
use facesync_common::error::{FacesyncError, FacesyncResult};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::ssml::VoiceConfig;

/// Encoding of the synthesized audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// MPEG layer 3, written to disk for the browser client.
    Mp3,
    /// 8 kHz 8-bit A-law, used for telephony playback.
    RawALaw8Khz,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::RawALaw8Khz => "alaw",
        }
    }
}

/// One synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: VoiceConfig,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, voice: VoiceConfig) -> Self {
        Self {
            text: text.into(),
            voice,
        }
    }

    /// Render this request as SSML.
    pub fn ssml(&self) -> String {
        crate::ssml::build_ssml(&self.text, &self.voice)
    }
}

/// Synthesized audio.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAudio {
    pub format: AudioFormat,
    pub data: Vec<u8>,
}

impl SpeechAudio {
    pub fn new(format: AudioFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Where an engine reports viseme events as they are produced.
///
/// Backed by a bounded channel, so a slow collector applies backpressure to
/// the engine instead of buffering without limit.
#[derive(Debug, Clone)]
pub struct VisemeSink {
    tx: mpsc::Sender<VisemeEvent>,
}

impl VisemeSink {
    pub fn new(tx: mpsc::Sender<VisemeEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink and the receiver that drains it.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<VisemeEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    /// Report one event. Fails once the collector has gone away.
    pub async fn send(&self, event: VisemeEvent) -> FacesyncResult<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| FacesyncError::speech("viseme collector closed before synthesis finished"))
    }
}

/// A text-to-speech backend that reports facial-expression visemes.
pub trait SpeechEngine: Send + Sync {
    /// Engine name for logging.
    fn name(&self) -> &str;

    /// Synthesize `request`, pushing viseme events into `sink` in order and
    /// returning the audio once synthesis completes.
    ///
    /// The sink is dropped when the returned future finishes, which ends
    /// the event stream.
    fn speak(
        &self,
        request: &SpeechRequest,
        sink: VisemeSink,
    ) -> impl Future<Output = FacesyncResult<SpeechAudio>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use facesync_animation_model::viseme::VisemeAnimation;

    fn event(id: u32) -> VisemeEvent {
        VisemeEvent {
            audio_offset_ticks: 0,
            viseme_id: id,
            animation: VisemeAnimation::default(),
        }
    }

    #[tokio::test]
    async fn test_sink_delivers_in_order() {
        let (sink, mut rx) = VisemeSink::channel(4);
        sink.send(event(1)).await.unwrap();
        sink.send(event(2)).await.unwrap();
        drop(sink);

        assert_eq!(rx.recv().await.unwrap().viseme_id, 1);
        assert_eq!(rx.recv().await.unwrap().viseme_id, 2);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_send_after_collector_drop_is_speech_error() {
        let (sink, rx) = VisemeSink::channel(1);
        drop(rx);

        let err = sink.send(event(0)).await.unwrap_err();
        assert!(matches!(err, FacesyncError::Speech { .. }));
    }

    #[test]
    fn test_request_renders_ssml() {
        let request = SpeechRequest::new("Hi", VoiceConfig::default());
        assert!(request.ssml().contains(">Hi</mstts:express-as>"));
    }

    #[test]
    fn test_audio_extension() {
        assert_eq!(AudioFormat::Mp3.extension(), "mp3");
        assert_eq!(AudioFormat::RawALaw8Khz.extension(), "alaw");
    }
}
