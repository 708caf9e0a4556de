//! The five-stage animation pipeline.
//!
//! 1. **Normalize** intensity and per-shape emphasis.
//! 2. **Smooth** with the three-point filter (optional).
//! 3. **Detect** pauses in the shaped sequence.
//! 4. **Synthesize** idle micro-expressions for each pause.
//! 5. **Merge** those overlays back into the timeline.
//!
//! Each call carries its own [`PipelineConfig`] and random generator; the
//! pipeline holds no state between calls, so concurrent requests cannot
//! observe each other's tuning.

use std::collections::BTreeMap;

use facesync_animation_model::frame::{Frame, Sequence};
use facesync_common::clock::{FrameClock, DEFAULT_FRAME_RATE};
use facesync_common::config::PipelineDefaults;
use facesync_common::error::FacesyncResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::idle::{IdleSynthesisConfig, IdleSynthesizer};
use crate::merge::merge_overlays;
use crate::normalize::{normalize, EmphasisMap};
use crate::pause::{Pause, PauseDetector, PauseDetectorConfig};
use crate::smooth::smooth;

/// Immutable tuning for one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub intensity: f64,
    pub smoothing_enabled: bool,
    pub emphasis: EmphasisMap,
    pub idle_synthesis_enabled: bool,
    pub frame_rate: f64,
    pub pause: PauseDetectorConfig,
    pub idle: IdleSynthesisConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            smoothing_enabled: true,
            emphasis: EmphasisMap::builtin(),
            idle_synthesis_enabled: true,
            frame_rate: DEFAULT_FRAME_RATE,
            pause: PauseDetectorConfig::default(),
            idle: IdleSynthesisConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Build a configuration from the application defaults.
    pub fn from_defaults(defaults: &PipelineDefaults) -> FacesyncResult<Self> {
        Ok(Self {
            intensity: defaults.intensity,
            smoothing_enabled: defaults.smoothing,
            emphasis: EmphasisMap::from_map(defaults.emphasis.clone())?,
            idle_synthesis_enabled: defaults.idle_visemes,
            frame_rate: defaults.frame_rate,
            pause: PauseDetectorConfig {
                activity_threshold: defaults.activity_threshold,
                min_pause_secs: defaults.min_pause_secs,
            },
            idle: IdleSynthesisConfig::default(),
        })
    }

    pub fn clock(&self) -> FrameClock {
        FrameClock::new(self.frame_rate)
    }
}

/// Per-request viseme tuning as sent by a client. Unset fields keep the
/// base configuration's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisemeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viseme_intensity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viseme_smoothing: Option<bool>,

    /// Merged onto the base emphasis map rather than replacing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viseme_emphasis: Option<BTreeMap<String, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_idle_visemes: Option<bool>,
}

impl VisemeOptions {
    /// Produce the configuration for one request. `base` is left untouched.
    ///
    /// An intensity that is not a positive finite number counts as unset.
    pub fn resolve(&self, base: &PipelineConfig) -> FacesyncResult<PipelineConfig> {
        let mut config = base.clone();

        match self.viseme_intensity {
            Some(intensity) if intensity.is_finite() && intensity > 0.0 => {
                config.intensity = intensity;
            }
            Some(intensity) => {
                tracing::warn!(intensity, "Ignoring invalid viseme intensity");
            }
            None => {}
        }

        if let Some(smoothing) = self.viseme_smoothing {
            config.smoothing_enabled = smoothing;
        }

        if let Some(overrides) = &self.viseme_emphasis {
            let overrides = EmphasisMap::from_map(overrides.clone())?;
            config.emphasis = base.emphasis.merged_with(&overrides);
        }

        if let Some(idle) = self.add_idle_visemes {
            config.idle_synthesis_enabled = idle;
        }

        Ok(config)
    }
}

/// Diagnostics from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Pauses found after shaping and smoothing.
    pub pauses: Vec<Pause>,
    /// Overlay frames synthesized across all pauses.
    pub overlay_frames_generated: usize,
    /// Overlay frames that landed inside their pause.
    pub overlay_frames_applied: usize,
}

/// Runs the five stages over a materialized sequence.
pub struct AnimationPipeline {
    config: PipelineConfig,
}

impl AnimationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process `frames` using `rng` for idle synthesis.
    pub fn run<R: Rng + ?Sized>(&self, frames: &[Frame], rng: &mut R) -> FacesyncResult<Sequence> {
        let (sequence, _) = self.run_with_report(frames, rng)?;
        Ok(sequence)
    }

    /// Process `frames` and return the pause/overlay diagnostics alongside.
    pub fn run_with_report<R: Rng + ?Sized>(
        &self,
        frames: &[Frame],
        rng: &mut R,
    ) -> FacesyncResult<(Sequence, PipelineReport)> {
        let cfg = &self.config;
        let clock = cfg.clock();

        let normalized = normalize(frames, cfg.intensity, &cfg.emphasis);
        let mut sequence = smooth(&normalized, cfg.smoothing_enabled)?;
        let mut report = PipelineReport::default();

        if cfg.idle_synthesis_enabled {
            let detector = PauseDetector::new(cfg.pause);
            let synthesizer = IdleSynthesizer::new(cfg.idle.clone());

            report.pauses = detector.detect(&sequence, &clock);
            for pause in &report.pauses {
                let overlays = synthesizer.synthesize(pause, &clock, rng);
                report.overlay_frames_generated += overlays.len();
                report.overlay_frames_applied +=
                    merge_overlays(&mut sequence, pause, &overlays, &clock);
            }
        }

        tracing::info!(
            frames = sequence.len(),
            intensity = cfg.intensity,
            smoothing = cfg.smoothing_enabled,
            idle = cfg.idle_synthesis_enabled,
            pauses = report.pauses.len(),
            overlays_applied = report.overlay_frames_applied,
            "Processed viseme timeline"
        );

        Ok((sequence, report))
    }

    /// Process with a generator seeded from `seed`; identical seeds give
    /// identical output.
    pub fn run_seeded(
        &self,
        frames: &[Frame],
        seed: u64,
    ) -> FacesyncResult<(Sequence, PipelineReport)> {
        self.run_with_report(frames, &mut StdRng::seed_from_u64(seed))
    }

    /// Process with a freshly seeded generator.
    pub fn run_with_entropy(&self, frames: &[Frame]) -> FacesyncResult<(Sequence, PipelineReport)> {
        self.run_with_report(frames, &mut StdRng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facesync_common::error::FacesyncError;

    fn speech_gap_speech() -> Vec<Frame> {
        (0..120)
            .map(|i| {
                let level = if (40..80).contains(&i) { 0.0 } else { 0.6 };
                Frame::neutral(i as f64 / 60.0, &["eyeBlinkLeft", "eyeBlinkRight", "jawOpen"])
                    .with_weight("jawOpen", level)
            })
            .collect()
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let (out, report) = AnimationPipeline::with_defaults().run_seeded(&[], 1).unwrap();
        assert!(out.is_empty());
        assert!(report.pauses.is_empty());
    }

    #[test]
    fn test_frame_count_is_preserved() {
        let frames = speech_gap_speech();
        let (out, _) = AnimationPipeline::with_defaults().run_seeded(&frames, 3).unwrap();
        assert_eq!(out.len(), frames.len());
        for (a, b) in out.iter().zip(&frames) {
            assert_eq!(a.time, b.time);
        }
    }

    #[test]
    fn test_idle_disabled_skips_pause_stages() {
        let config = PipelineConfig {
            idle_synthesis_enabled: false,
            ..Default::default()
        };
        let (_, report) = AnimationPipeline::new(config)
            .run_seeded(&speech_gap_speech(), 3)
            .unwrap();
        assert!(report.pauses.is_empty());
        assert_eq!(report.overlay_frames_generated, 0);
    }

    #[test]
    fn test_pauses_are_found_after_smoothing() {
        let (_, report) = AnimationPipeline::with_defaults()
            .run_seeded(&speech_gap_speech(), 3)
            .unwrap();
        // Smoothing bleeds speech one frame into each edge of the gap.
        assert_eq!(report.pauses.len(), 1);
        assert_eq!(report.pauses[0].start_index, 41);
        assert_eq!(report.pauses[0].end_index, 78);
    }

    #[test]
    fn test_smoothing_error_propagates() {
        let mut frames = speech_gap_speech();
        frames[1].blendshapes.insert("mouthClose".to_string(), 0.0);
        let err = AnimationPipeline::with_defaults()
            .run_seeded(&frames, 0)
            .unwrap_err();
        assert!(matches!(err, FacesyncError::InvalidFrame { .. }));
    }

    #[test]
    fn test_options_merge_onto_base_without_mutating_it() {
        let base = PipelineConfig::default();
        let options = VisemeOptions {
            viseme_intensity: Some(1.5),
            viseme_smoothing: Some(false),
            viseme_emphasis: Some([("jawOpen".to_string(), 2.0)].into_iter().collect()),
            add_idle_visemes: Some(false),
        };

        let resolved = options.resolve(&base).unwrap();
        assert_eq!(resolved.intensity, 1.5);
        assert!(!resolved.smoothing_enabled);
        assert!(!resolved.idle_synthesis_enabled);
        assert_eq!(resolved.emphasis.get("jawOpen"), Some(2.0));
        assert_eq!(resolved.emphasis.get("mouthOpen"), Some(1.3));

        assert_eq!(base, PipelineConfig::default());
    }

    #[test]
    fn test_options_ignore_invalid_intensity() {
        let base = PipelineConfig::default();
        for bad in [0.0, -1.0, f64::NAN] {
            let options = VisemeOptions {
                viseme_intensity: Some(bad),
                ..Default::default()
            };
            assert_eq!(options.resolve(&base).unwrap().intensity, 1.0);
        }
    }

    #[test]
    fn test_options_reject_bad_emphasis() {
        let options = VisemeOptions {
            viseme_emphasis: Some([("jawOpen".to_string(), 0.0)].into_iter().collect()),
            ..Default::default()
        };
        let err = options.resolve(&PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, FacesyncError::Config { .. }));
    }

    #[test]
    fn test_options_parse_client_json() {
        let options: VisemeOptions =
            serde_json::from_str(r#"{"visemeIntensity":1.2,"addIdleVisemes":false}"#).unwrap();
        assert_eq!(options.viseme_intensity, Some(1.2));
        assert_eq!(options.add_idle_visemes, Some(false));
        assert_eq!(options.viseme_smoothing, None);
    }

    #[test]
    fn test_from_defaults() {
        let defaults = PipelineDefaults {
            intensity: 0.9,
            min_pause_secs: 0.5,
            ..Default::default()
        };
        let config = PipelineConfig::from_defaults(&defaults).unwrap();
        assert_eq!(config.intensity, 0.9);
        assert_eq!(config.pause.min_pause_secs, 0.5);
        assert_eq!(config.emphasis, EmphasisMap::builtin());
    }
}
