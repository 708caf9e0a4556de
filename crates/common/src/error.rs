//! Error types shared across FaceSync crates.

use std::path::PathBuf;

/// Top-level error type for FaceSync operations.
#[derive(Debug, thiserror::Error)]
pub enum FacesyncError {
    /// Malformed frame data or a violated sequence invariant.
    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The upstream speech engine failed.
    #[error("Speech engine error: {message}")]
    Speech { message: String },

    /// The upstream language model failed.
    #[error("Dialogue model error: {message}")]
    Dialogue { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FacesyncError.
pub type FacesyncResult<T> = Result<T, FacesyncError>;

impl FacesyncError {
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn speech(msg: impl Into<String>) -> Self {
        Self::Speech {
            message: msg.into(),
        }
    }

    pub fn dialogue(msg: impl Into<String>) -> Self {
        Self::Dialogue {
            message: msg.into(),
        }
    }

    /// Whether this error came from an external collaborator rather than
    /// from the animation data itself.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Speech { .. } | Self::Dialogue { .. })
    }
}
