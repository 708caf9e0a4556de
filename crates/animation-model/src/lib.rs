//! FaceSync Animation Model
//!
//! Defines the core data contracts for facial animation:
//! - **Blendshapes:** The engine's fixed, ordered shape vocabulary
//! - **Frames:** Timestamped blendshape snapshots on a fixed-rate grid
//! - **Visemes:** Raw engine events and their materialization into frames
//! - **Payload:** The timeline record delivered to the render client
//!
//! All weights are nominally in `[0.0, 1.0]`; all times are seconds from
//! the start of the utterance.

pub mod blendshape;
pub mod frame;
pub mod payload;
pub mod viseme;

pub use blendshape::*;
pub use frame::*;
pub use payload::*;
pub use viseme::*;
