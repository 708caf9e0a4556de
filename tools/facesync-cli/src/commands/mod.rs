pub mod ask;
pub mod init_config;
pub mod pauses;
pub mod process;
pub mod speak;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Args;
use facesync_animation_model::blendshape::BlendshapeVocabulary;
use facesync_animation_model::frame::Frame;
use facesync_animation_model::viseme::{materialize_frames, parse_viseme_events};
use facesync_common::clock::FrameClock;
use facesync_common::config::AppConfig;
use facesync_processing_core::pipeline::{PipelineConfig, VisemeOptions};

/// Per-run viseme tuning shared by the pipeline commands.
#[derive(Args, Debug, Clone, Default)]
pub struct TuningArgs {
    /// Global intensity multiplier
    #[arg(long)]
    pub intensity: Option<f64>,

    /// Disable the smoothing filter
    #[arg(long)]
    pub no_smoothing: bool,

    /// Disable idle micro-expressions
    #[arg(long)]
    pub no_idle: bool,

    /// Per-shape emphasis override, e.g. jawOpen=1.5 (repeatable)
    #[arg(long = "emphasis", value_name = "SHAPE=MULT")]
    pub emphasis: Vec<String>,
}

impl TuningArgs {
    pub fn to_options(&self) -> anyhow::Result<VisemeOptions> {
        Ok(VisemeOptions {
            viseme_intensity: self.intensity,
            viseme_smoothing: self.no_smoothing.then_some(false),
            viseme_emphasis: parse_emphasis(&self.emphasis)?,
            add_idle_visemes: self.no_idle.then_some(false),
        })
    }

    /// Merge these flags onto the configured pipeline defaults.
    pub fn resolve(&self, config: &AppConfig) -> anyhow::Result<PipelineConfig> {
        let base = PipelineConfig::from_defaults(&config.pipeline)?;
        Ok(self.to_options()?.resolve(&base)?)
    }
}

/// Parse repeated `shape=multiplier` arguments.
fn parse_emphasis(pairs: &[String]) -> anyhow::Result<Option<BTreeMap<String, f64>>> {
    if pairs.is_empty() {
        return Ok(None);
    }

    let mut map = BTreeMap::new();
    for pair in pairs {
        let (shape, multiplier) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Emphasis must be SHAPE=MULT, got '{pair}'"))?;
        let multiplier: f64 = multiplier
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid emphasis multiplier in '{pair}'"))?;
        map.insert(shape.trim().to_string(), multiplier);
    }
    Ok(Some(map))
}

/// Read a JSONL viseme recording and expand it onto the frame grid.
pub fn load_recording(path: &Path, clock: &FrameClock) -> anyhow::Result<Vec<Frame>> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| anyhow::anyhow!("Recording not found: {}", path.display()))?;
    let events = parse_viseme_events(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse recording: {e}"))?;
    let frames = materialize_frames(&events, &BlendshapeVocabulary::facial_expression(), clock)?;

    tracing::info!(events = events.len(), frames = frames.len(), "Loaded recording");
    Ok(frames)
}

/// Write pretty JSON to `output`, or to stdout when no path is given.
pub fn write_json<T: serde::Serialize>(value: &T, output: Option<&PathBuf>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
