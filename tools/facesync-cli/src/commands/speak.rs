//! Speak text through a scripted engine and write the client payload.

use std::path::PathBuf;

use facesync_common::config::AppConfig;
use facesync_speech::{audio_file_name, text_to_speech, AudioFormat, ScriptedEngine, VoiceConfig};

use super::{write_json, TuningArgs};

pub async fn run(
    config: &AppConfig,
    text: String,
    recording: PathBuf,
    audio: Option<PathBuf>,
    output: Option<PathBuf>,
    tuning: TuningArgs,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let engine = ScriptedEngine::load(&recording, audio.as_deref())?;
    let voice = VoiceConfig::from(&config.speech);
    let pipeline_config = tuning.resolve(config)?;

    let synthesis = text_to_speech(&engine, &text, &voice, &pipeline_config, seed).await?;
    eprintln!(
        "Spoke {} frames with {} pauses at {}",
        synthesis.blend_data.len(),
        synthesis.pauses.len(),
        synthesis.synthesized_at.to_rfc3339()
    );

    // A-law is the streaming format and travels inline. MP3 lands next to
    // the response file; stdout output gets no MP3.
    if synthesis.audio.format == AudioFormat::RawALaw8Khz {
        return write_json(&synthesis.into_streaming_response(), output.as_ref());
    }

    let filename = match (&output, synthesis.audio.is_empty()) {
        (Some(path), false) => {
            let name = audio_file_name(&synthesis.audio, &mut rand::thread_rng());
            let dir = path.parent().map(PathBuf::from).unwrap_or_default();
            let audio_path = dir.join(&name);
            std::fs::write(&audio_path, &synthesis.audio.data).map_err(|e| {
                anyhow::anyhow!("Failed to write audio {}: {e}", audio_path.display())
            })?;
            eprintln!("Wrote {}", audio_path.display());
            Some(format!("/{name}"))
        }
        _ => None,
    };

    write_json(&synthesis.into_response(filename), output.as_ref())
}
