//! FaceSync Common Utilities
//!
//! Shared infrastructure for all FaceSync crates:
//! - Error types and result aliases
//! - Fixed-rate frame timing
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
