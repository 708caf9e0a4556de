//! Run the animation pipeline over a viseme recording.

use std::path::PathBuf;

use facesync_animation_model::payload::TalkResponse;
use facesync_common::config::AppConfig;
use facesync_processing_core::pipeline::AnimationPipeline;

use super::{load_recording, write_json, TuningArgs};

pub fn run(
    config: &AppConfig,
    recording: PathBuf,
    output: Option<PathBuf>,
    tuning: TuningArgs,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let pipeline_config = tuning.resolve(config)?;

    let frames = load_recording(&recording, &pipeline_config.clock())?;
    let pipeline = AnimationPipeline::new(pipeline_config);
    let (blend_data, report) = match seed {
        Some(seed) => pipeline.run_seeded(&frames, seed)?,
        None => pipeline.run_with_entropy(&frames)?,
    };

    eprintln!(
        "Processed {} frames, {} pauses, {} overlay frames applied",
        blend_data.len(),
        report.pauses.len(),
        report.overlay_frames_applied
    );

    write_json(&TalkResponse::new(blend_data), output.as_ref())
}
