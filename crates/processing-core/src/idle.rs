//! Idle micro-expression synthesis.
//!
//! Fills pauses with short procedural overlays so the face does not freeze
//! between phrases:
//!
//! - **Blink:** a 0.2s `sin(tπ)` pulse on both eyelids, peaking at 0.8.
//! - **Secondary expression:** a 0.4s quadratic ease-in-out of one of a few
//!   fixed templates (slight smile, inner brow raise, outer brow raise).
//!
//! Each overlay is gated by the pause length and a Bernoulli draw. All
//! randomness comes from the caller's generator, consumed in a fixed order
//! (blink gate, blink start, expression gate, expression start, template),
//! so a seeded generator reproduces placement exactly.

use std::f64::consts::PI;

use facesync_animation_model::blendshape::{
    BROW_INNER_UP, BROW_OUTER_UP_LEFT, BROW_OUTER_UP_RIGHT, EYE_BLINK_LEFT, EYE_BLINK_RIGHT,
    MOUTH_SMILE_LEFT, MOUTH_SMILE_RIGHT,
};
use facesync_animation_model::frame::BlendshapeWeights;
use facesync_common::clock::FrameClock;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pause::Pause;

/// A partial frame produced by the synthesizer, timed in absolute seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroExpressionFrame {
    pub time: f64,
    /// Only the shapes the overlay touches.
    pub blendshapes: BlendshapeWeights,
}

/// A fixed secondary-expression shape set at full strength.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionTemplate {
    pub name: &'static str,
    pub weights: Vec<(&'static str, f64)>,
}

impl ExpressionTemplate {
    /// The built-in templates, in selection order.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self {
                name: "smile",
                weights: vec![(MOUTH_SMILE_LEFT, 0.3), (MOUTH_SMILE_RIGHT, 0.3)],
            },
            Self {
                name: "inner_brow_raise",
                weights: vec![(BROW_INNER_UP, 0.2)],
            },
            Self {
                name: "outer_brow_raise",
                weights: vec![(BROW_OUTER_UP_LEFT, 0.15), (BROW_OUTER_UP_RIGHT, 0.15)],
            },
        ]
    }
}

/// Tuning for the idle synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct IdleSynthesisConfig {
    /// A pause must be strictly longer than this to get a blink (seconds).
    pub blink_min_pause_secs: f64,
    /// Chance that an eligible pause gets a blink.
    pub blink_probability: f64,
    pub blink_duration_secs: f64,
    /// Blink start is drawn from `[pause start, pause end - tail]`.
    pub blink_tail_secs: f64,
    /// Eyelid weight at the top of the blink.
    pub blink_peak: f64,

    /// A pause must be strictly longer than this to get an expression (seconds).
    pub expression_min_pause_secs: f64,
    /// Chance that an eligible pause gets an expression.
    pub expression_probability: f64,
    pub expression_duration_secs: f64,
    /// Expression start is drawn from `[pause start, pause end - tail]`.
    pub expression_tail_secs: f64,
    pub templates: Vec<ExpressionTemplate>,
}

impl Default for IdleSynthesisConfig {
    fn default() -> Self {
        Self {
            blink_min_pause_secs: 0.5,
            blink_probability: 0.6,
            blink_duration_secs: 0.2,
            blink_tail_secs: 0.3,
            blink_peak: 0.8,
            expression_min_pause_secs: 0.7,
            expression_probability: 0.4,
            expression_duration_secs: 0.4,
            expression_tail_secs: 0.5,
            templates: ExpressionTemplate::builtin(),
        }
    }
}

/// Generates micro-expression overlays for a pause.
pub struct IdleSynthesizer {
    config: IdleSynthesisConfig,
}

impl IdleSynthesizer {
    pub fn new(config: IdleSynthesisConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(IdleSynthesisConfig::default())
    }

    pub fn config(&self) -> &IdleSynthesisConfig {
        &self.config
    }

    /// Synthesize zero, one, or two overlays for `pause`.
    ///
    /// Overlay windows are drawn independently and may overlap or run past
    /// the pause end; the merger resolves both.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        pause: &Pause,
        clock: &FrameClock,
        rng: &mut R,
    ) -> Vec<MicroExpressionFrame> {
        let cfg = &self.config;
        let pause_start = pause.start_secs(clock);
        let length = pause.length_secs;
        let mut frames = vec![];

        if length > cfg.blink_min_pause_secs && passes_gate(rng, cfg.blink_probability) {
            let start = pause_start + rng.gen::<f64>() * (length - cfg.blink_tail_secs);
            self.push_blink(start, clock, &mut frames);
            tracing::debug!(start_index = pause.start_index, blink_start = start, "Blink overlay");
        }

        if length > cfg.expression_min_pause_secs
            && passes_gate(rng, cfg.expression_probability)
        {
            let start = pause_start + rng.gen::<f64>() * (length - cfg.expression_tail_secs);
            if !cfg.templates.is_empty() {
                let template = &cfg.templates[rng.gen_range(0..cfg.templates.len())];
                self.push_expression(template, start, clock, &mut frames);
                tracing::debug!(
                    start_index = pause.start_index,
                    expression_start = start,
                    template = template.name,
                    "Expression overlay"
                );
            }
        }

        frames
    }

    fn push_blink(&self, start: f64, clock: &FrameClock, out: &mut Vec<MicroExpressionFrame>) {
        let span = self.config.blink_duration_secs * clock.frame_rate();
        for i in 0..clock.samples_in(self.config.blink_duration_secs) {
            let t = i as f64 / span;
            let weight = blink_envelope(t) * self.config.blink_peak;
            out.push(MicroExpressionFrame {
                time: start + i as f64 / clock.frame_rate(),
                blendshapes: [
                    (EYE_BLINK_LEFT.to_string(), weight),
                    (EYE_BLINK_RIGHT.to_string(), weight),
                ]
                .into_iter()
                .collect(),
            });
        }
    }

    fn push_expression(
        &self,
        template: &ExpressionTemplate,
        start: f64,
        clock: &FrameClock,
        out: &mut Vec<MicroExpressionFrame>,
    ) {
        let span = self.config.expression_duration_secs * clock.frame_rate();
        for i in 0..clock.samples_in(self.config.expression_duration_secs) {
            let eased = ease_in_out(i as f64 / span);
            out.push(MicroExpressionFrame {
                time: start + i as f64 / clock.frame_rate(),
                blendshapes: template
                    .weights
                    .iter()
                    .map(|(name, base)| (name.to_string(), base * eased))
                    .collect(),
            });
        }
    }
}

/// Bernoulli trial that succeeds with `probability`: the draw must exceed
/// `1 - probability`.
fn passes_gate<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.gen::<f64>() > 1.0 - probability
}

/// 0 -> 1 -> 0 over `t` in `[0, 1]`.
fn blink_envelope(t: f64) -> f64 {
    (t * PI).sin()
}

/// Quadratic ease-in-out over `t` in `[0, 1]`.
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
