//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trial_log_decoder::ParserConfig;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub parser: ParserSettings,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// Trial log file to analyse
    pub file: Option<PathBuf>,
}

/// Overrides for the decoder's [`ParserConfig`] defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParserSettings {
    pub units_per_turn: Option<f64>,
    pub match_tolerance: Option<f64>,
    pub timestamp_format: Option<String>,
}

impl ParserSettings {
    /// Build the decoder configuration, applying any overrides
    pub fn to_parser_config(&self) -> ParserConfig {
        let mut config = ParserConfig::new();
        if let Some(units) = self.units_per_turn {
            config = config.with_units_per_turn(units);
        }
        if let Some(tolerance) = self.match_tolerance {
            config = config.with_match_tolerance(tolerance);
        }
        if let Some(format) = &self.timestamp_format {
            config = config.with_timestamp_format(format.clone());
        }
        config
    }
}

/// Frame-series parameters for the visualization export
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Seconds into the trial to start from
    #[serde(default)]
    pub start_secs: f64,
    /// Sliding window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: f64,
    /// Step between frames in seconds
    #[serde(default = "default_step_secs")]
    pub step_secs: f64,
    /// How many seconds of trial to cover
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
}

fn default_window_secs() -> f64 {
    3.0
}

fn default_step_secs() -> f64 {
    0.1
}

fn default_duration_secs() -> f64 {
    300.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            start_secs: 0.0,
            window_secs: default_window_secs(),
            step_secs: default_step_secs(),
            duration_secs: default_duration_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Where to write the frame series JSON, if anywhere
    pub frames_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
