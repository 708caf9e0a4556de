//! Application configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::clock::DEFAULT_FRAME_RATE;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Default animation pipeline tuning.
    #[serde(default)]
    pub pipeline: PipelineDefaults,

    /// Default voice settings for the speech engine.
    #[serde(default)]
    pub speech: SpeechSettings,

    /// Language-model endpoint settings.
    #[serde(default)]
    pub dialogue: DialogueSettings,
}

/// Baseline animation tuning that per-request options are merged onto.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineDefaults {
    /// Global multiplier applied to every blendshape weight.
    pub intensity: f64,

    /// Whether the three-point smoothing filter runs.
    pub smoothing: bool,

    /// Per-shape emphasis multipliers.
    pub emphasis: BTreeMap<String, f64>,

    /// Whether idle micro-expressions are injected into pauses.
    pub idle_visemes: bool,

    /// Animation sampling rate (frames per second).
    pub frame_rate: f64,

    /// Weight at or below which a shape counts as at rest.
    pub activity_threshold: f64,

    /// Shortest run of resting frames that counts as a pause (seconds).
    pub min_pause_secs: f64,
}

/// Voice used when building synthesis requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Neural voice name.
    pub voice: String,

    /// Speaking style passed to `express-as`.
    pub style: String,

    /// BCP-47 language tag.
    pub language: String,
}

/// Language-model endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueSettings {
    /// Full URL of the generate endpoint.
    pub api_url: String,

    /// Model name sent with each request.
    pub model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "facesync=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

/// Built-in emphasis map: open mouth and jaw shapes are exaggerated, smiles
/// lifted slightly, and squints damped.
pub fn default_emphasis() -> BTreeMap<String, f64> {
    [
        ("mouthOpen", 1.3),
        ("jawOpen", 1.3),
        ("mouthSmileLeft", 1.2),
        ("mouthSmileRight", 1.2),
        ("mouthFunnel", 1.25),
        ("mouthPucker", 1.25),
        ("eyeSquintLeft", 0.8),
        ("eyeSquintRight", 0.8),
    ]
    .into_iter()
    .map(|(name, multiplier)| (name.to_string(), multiplier))
    .collect()
}

impl Default for PipelineDefaults {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            smoothing: true,
            emphasis: default_emphasis(),
            idle_visemes: true,
            frame_rate: DEFAULT_FRAME_RATE,
            activity_threshold: 0.05,
            min_pause_secs: 0.3,
        }
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            voice: "en-US-AriaNeural".to_string(),
            style: "empathetic".to_string(),
            language: "en-US".to_string(),
        }
    }
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:11434/api/generate".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults,
    /// then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_file().unwrap_or_default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    fn load_file() -> Option<Self> {
        let config_path = config_file_path();
        if !config_path.exists() {
            return None;
        }
        match std::fs::read_to_string(&config_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                None
            }
        }
    }

    /// Apply `LLM_API_URL` / `LLM_MODEL` overrides using the given lookup.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("LLM_API_URL").filter(|v| !v.trim().is_empty()) {
            self.dialogue.api_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL").filter(|v| !v.trim().is_empty()) {
            self.dialogue.model = model;
        }
    }

    /// Save config to the standard location and return the path written.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("facesync").join("config.json")
}
