//! FaceSync Processing Core
//!
//! Turns the raw viseme stream into a production animation timeline:
//! - **Normalize:** Global intensity and per-shape emphasis
//! - **Smooth:** Three-point temporal filter
//! - **Pauses:** Detect spans where the face is at rest
//! - **Idle:** Procedural blinks and micro-expressions for those spans
//! - **Merge:** Fold overlays back into the timeline
//!
//! This crate is pure computation with no I/O and no global state.
//! All inputs are data; all outputs are data.

pub mod idle;
pub mod merge;
pub mod normalize;
pub mod pause;
pub mod pipeline;
pub mod smooth;

pub use idle::{IdleSynthesisConfig, IdleSynthesizer, MicroExpressionFrame};
pub use normalize::EmphasisMap;
pub use pause::{Pause, PauseDetector, PauseDetectorConfig};
pub use pipeline::{AnimationPipeline, PipelineConfig, PipelineReport, VisemeOptions};
