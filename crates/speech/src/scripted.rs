//! A speech engine that replays a recorded viseme stream.
//!
//! Used by tests and offline tooling in place of a live neural voice. The
//! recording is the JSONL format from
//! [`facesync_animation_model::viseme`]; audio is returned verbatim.

use std::path::Path;
use std::sync::Mutex;

use facesync_animation_model::viseme::{parse_viseme_events, VisemeEvent};
use facesync_common::error::{FacesyncError, FacesyncResult};

use crate::engine::{AudioFormat, SpeechAudio, SpeechEngine, SpeechRequest, VisemeSink};

/// Replays fixed events and audio for every request.
pub struct ScriptedEngine {
    events: Vec<VisemeEvent>,
    audio: SpeechAudio,
    failure: Option<String>,
    spoken: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn new(events: Vec<VisemeEvent>, audio: SpeechAudio) -> Self {
        Self {
            events,
            audio,
            failure: None,
            spoken: Mutex::new(Vec::new()),
        }
    }

    /// An engine whose every request fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(vec![], SpeechAudio::new(AudioFormat::Mp3, vec![]))
        }
    }

    /// Build from JSONL recording content.
    pub fn from_jsonl(jsonl: &str, audio: SpeechAudio) -> FacesyncResult<Self> {
        Ok(Self::new(parse_viseme_events(jsonl)?, audio))
    }

    /// Load a recording and optional audio file from disk.
    ///
    /// Audio with an `.alaw` extension is tagged as 8 kHz A-law; anything
    /// else as MP3. Without an audio file the engine returns empty MP3 data.
    pub fn load(recording: &Path, audio: Option<&Path>) -> FacesyncResult<Self> {
        let jsonl = read_existing(recording, |p| std::fs::read_to_string(p))?;

        let audio = match audio {
            Some(path) => {
                let format = match path.extension().and_then(|e| e.to_str()) {
                    Some("alaw") => AudioFormat::RawALaw8Khz,
                    _ => AudioFormat::Mp3,
                };
                SpeechAudio::new(format, read_existing(path, |p| std::fs::read(p))?)
            }
            None => SpeechAudio::new(AudioFormat::Mp3, vec![]),
        };

        let engine = Self::from_jsonl(&jsonl, audio)?;
        tracing::info!(
            recording = %recording.display(),
            events = engine.events.len(),
            "Loaded scripted speech"
        );
        Ok(engine)
    }

    /// Number of recorded events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// SSML of every request this engine has received, oldest first.
    pub fn spoken_ssml(&self) -> Vec<String> {
        self.spoken
            .lock()
            .map(|spoken| spoken.clone())
            .unwrap_or_default()
    }
}

fn read_existing<T>(
    path: &Path,
    read: impl FnOnce(&Path) -> std::io::Result<T>,
) -> FacesyncResult<T> {
    if !path.exists() {
        return Err(FacesyncError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(read(path)?)
}

impl SpeechEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn speak(&self, request: &SpeechRequest, sink: VisemeSink) -> FacesyncResult<SpeechAudio> {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(request.ssml());
        }

        if let Some(message) = &self.failure {
            return Err(FacesyncError::speech(message.clone()));
        }

        for event in &self.events {
            sink.send(event.clone()).await?;
            tokio::task::yield_now().await;
        }

        Ok(self.audio.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssml::VoiceConfig;

    const RECORDING: &str = r#"
# two events, three rows of two shapes
{"audioOffsetTicks":0,"visemeId":0,"animation":{"FrameIndex":0,"BlendShapes":[[0.1,0.2],[0.3,0.4]]}}
{"audioOffsetTicks":333333,"visemeId":4,"animation":{"FrameIndex":2,"BlendShapes":[[0.5,0.6]]}}
"#;

    #[test]
    fn test_from_jsonl() {
        let engine =
            ScriptedEngine::from_jsonl(RECORDING, SpeechAudio::new(AudioFormat::Mp3, vec![])).unwrap();
        assert_eq!(engine.event_count(), 2);
    }

    #[test]
    fn test_from_jsonl_rejects_malformed_line() {
        let err = ScriptedEngine::from_jsonl("{not json", SpeechAudio::new(AudioFormat::Mp3, vec![]))
            .err()
            .unwrap();
        assert!(matches!(err, FacesyncError::Json(_)));
    }

    #[test]
    fn test_load_missing_recording() {
        let err = ScriptedEngine::load(Path::new("/nonexistent/visemes.jsonl"), None)
            .err()
            .unwrap();
        assert!(matches!(err, FacesyncError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_tags_alaw_audio() {
        let dir = std::env::temp_dir().join(format!("facesync-scripted-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let recording = dir.join("visemes.jsonl");
        let audio = dir.join("reply.alaw");
        std::fs::write(&recording, RECORDING).unwrap();
        std::fs::write(&audio, [0xd5u8, 0x55]).unwrap();

        let engine = ScriptedEngine::load(&recording, Some(&audio)).unwrap();
        assert_eq!(engine.audio.format, AudioFormat::RawALaw8Khz);
        assert_eq!(engine.audio.data, vec![0xd5, 0x55]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_speak_records_ssml() {
        let engine =
            ScriptedEngine::from_jsonl(RECORDING, SpeechAudio::new(AudioFormat::Mp3, vec![9])).unwrap();
        let (sink, mut rx) = VisemeSink::channel(8);

        let audio = engine
            .speak(&SpeechRequest::new("Hey", VoiceConfig::default()), sink)
            .await
            .unwrap();

        assert_eq!(audio.data, vec![9]);
        assert_eq!(rx.recv().await.unwrap().viseme_id, 0);
        assert_eq!(rx.recv().await.unwrap().viseme_id, 4);
        assert!(rx.recv().await.is_none());

        let spoken = engine.spoken_ssml();
        assert_eq!(spoken.len(), 1);
        assert!(spoken[0].contains(">Hey</mstts:express-as>"));
    }
}
