//! Text-to-speech orchestration: engine, materialization, then pipeline.

use chrono::{DateTime, Utc};
use facesync_animation_model::blendshape::BlendshapeVocabulary;
use facesync_animation_model::frame::Sequence;
use facesync_animation_model::payload::TalkResponse;
use facesync_animation_model::viseme::materialize_frames;
use facesync_common::error::{FacesyncError, FacesyncResult};
use facesync_processing_core::pause::Pause;
use facesync_processing_core::pipeline::{AnimationPipeline, PipelineConfig};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::collect::collect_visemes;
use crate::engine::{SpeechAudio, SpeechEngine, SpeechRequest};
use crate::ssml::VoiceConfig;

/// Length of the random part of generated audio file names.
const AUDIO_NAME_SUFFIX_LEN: usize = 5;

/// The result of speaking one reply.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSynthesis {
    /// Processed animation timeline.
    pub blend_data: Sequence,
    pub audio: SpeechAudio,
    /// Pauses the pipeline filled (empty when idle synthesis was off).
    pub pauses: Vec<Pause>,
    pub synthesized_at: DateTime<Utc>,
}

impl SpeechSynthesis {
    /// Client payload referencing audio stored under `filename`.
    pub fn into_response(self, filename: Option<String>) -> TalkResponse {
        let response = TalkResponse::new(self.blend_data);
        match filename {
            Some(name) => response.with_filename(name),
            None => response,
        }
    }

    /// Client payload carrying the audio bytes inline.
    pub fn into_streaming_response(self) -> TalkResponse {
        TalkResponse::new(self.blend_data).with_audio_data(self.audio.data)
    }
}

/// Speak `text` and build its animation timeline.
///
/// With `seed` set, idle synthesis is reproducible; otherwise it draws from
/// fresh entropy. Engine failures surface as [`FacesyncError::Speech`]
/// whatever their original class, and no timeline is produced.
pub async fn text_to_speech<E: SpeechEngine>(
    engine: &E,
    text: &str,
    voice: &VoiceConfig,
    config: &PipelineConfig,
    seed: Option<u64>,
) -> FacesyncResult<SpeechSynthesis> {
    let request = SpeechRequest::new(text, voice.clone());
    tracing::info!(
        engine = engine.name(),
        voice = %voice.name,
        chars = text.chars().count(),
        "Synthesizing speech"
    );

    let collected = collect_visemes(engine, &request)
        .await
        .map_err(|e| match e {
            FacesyncError::Speech { .. } => e,
            other => FacesyncError::speech(other.to_string()),
        })?;

    let frames = materialize_frames(
        &collected.events,
        &BlendshapeVocabulary::facial_expression(),
        &config.clock(),
    )?;

    let pipeline = AnimationPipeline::new(config.clone());
    let (blend_data, report) = match seed {
        Some(seed) => pipeline.run_seeded(&frames, seed)?,
        None => pipeline.run_with_entropy(&frames)?,
    };

    Ok(SpeechSynthesis {
        blend_data,
        audio: collected.audio,
        pauses: report.pauses,
        synthesized_at: Utc::now(),
    })
}

/// A fresh audio file name of the form `speech-xxxxx.<ext>`.
pub fn audio_file_name<R: Rng + ?Sized>(audio: &SpeechAudio, rng: &mut R) -> String {
    let suffix: String = (0..AUDIO_NAME_SUFFIX_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect();
    format!("speech-{suffix}.{}", audio.format.extension())
}
