//! List the pauses the pipeline would fill with idle motion.

use std::path::PathBuf;

use facesync_common::config::AppConfig;
use facesync_processing_core::normalize::normalize;
use facesync_processing_core::pause::PauseDetector;
use facesync_processing_core::pipeline::PipelineConfig;
use facesync_processing_core::smooth::smooth;
use serde::Serialize;

use super::{load_recording, write_json};

#[derive(Serialize)]
struct PauseRow {
    start_index: usize,
    end_index: usize,
    start_secs: f64,
    length_secs: f64,
}

pub fn run(
    config: &AppConfig,
    recording: PathBuf,
    threshold: Option<f64>,
    min_pause: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let mut pipeline_config = PipelineConfig::from_defaults(&config.pipeline)?;
    if let Some(threshold) = threshold {
        pipeline_config.pause.activity_threshold = threshold;
    }
    if let Some(min_pause) = min_pause {
        pipeline_config.pause.min_pause_secs = min_pause;
    }

    let clock = pipeline_config.clock();
    let frames = load_recording(&recording, &clock)?;
    let shaped = normalize(&frames, pipeline_config.intensity, &pipeline_config.emphasis);
    let shaped = smooth(&shaped, pipeline_config.smoothing_enabled)?;
    let pauses = PauseDetector::new(pipeline_config.pause).detect(&shaped, &clock);

    let rows: Vec<PauseRow> = pauses
        .iter()
        .map(|p| PauseRow {
            start_index: p.start_index,
            end_index: p.end_index,
            start_secs: p.start_secs(&clock),
            length_secs: p.length_secs,
        })
        .collect();

    if json {
        return write_json(&rows, None);
    }

    println!(
        "{} frames ({:.2}s), {} pauses",
        frames.len(),
        clock.duration_of(frames.len()),
        rows.len()
    );
    for row in &rows {
        println!(
            "  frames {:>5}..={:<5}  at {:>7.3}s  for {:.3}s",
            row.start_index, row.end_index, row.start_secs, row.length_secs
        );
    }
    Ok(())
}
