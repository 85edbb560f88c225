//! Parser configuration types
//!
//! The rig's log format is identified by free-text markers and a handful of
//! instrument constants. They are collected here as named configuration
//! values so the parser itself carries no magic strings.

use serde::{Deserialize, Serialize};

/// Rotary-encoder counts per full turn of the running ball
pub const ROTARY_ENCODER_UNITS_PER_TURN: f64 = 36_800.0;

/// Timestamp layout written by the rig logger (date and time tokens joined
/// with a single space)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Configuration for the log parser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Encoder counts per full turn, used to derive the heading angle
    #[serde(default = "default_units_per_turn")]
    pub units_per_turn: f64,

    /// chrono format string for the leading date/time tokens
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Substring identifying a position line
    #[serde(default = "default_position_marker")]
    pub position_marker: String,

    /// Substring identifying any reward line
    #[serde(default = "default_reward_marker")]
    pub reward_marker: String,

    /// Marker for a lure positioned by the task logic
    #[serde(default = "default_positioned_marker")]
    pub positioned_marker: String,

    /// Marker for a lure positioned by the experimenter
    #[serde(default = "default_manual_marker")]
    pub manual_marker: String,

    /// Marker for a collected lure
    #[serde(default = "default_delivered_marker")]
    pub delivered_marker: String,

    /// Spatial tolerance when matching a delivery to its positioned reward
    /// (0.0 = exact coordinate equality)
    #[serde(default)]
    pub match_tolerance: f64,
}

fn default_units_per_turn() -> f64 {
    ROTARY_ENCODER_UNITS_PER_TURN
}

fn default_timestamp_format() -> String {
    TIMESTAMP_FORMAT.to_string()
}

fn default_position_marker() -> String {
    "GainX".to_string()
}

fn default_reward_marker() -> String {
    "Reward".to_string()
}

fn default_positioned_marker() -> String {
    "RewardPositioned".to_string()
}

fn default_manual_marker() -> String {
    "Manual Reward_activated".to_string()
}

fn default_delivered_marker() -> String {
    "Reward_delivered".to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            units_per_turn: default_units_per_turn(),
            timestamp_format: default_timestamp_format(),
            position_marker: default_position_marker(),
            reward_marker: default_reward_marker(),
            positioned_marker: default_positioned_marker(),
            manual_marker: default_manual_marker(),
            delivered_marker: default_delivered_marker(),
            match_tolerance: 0.0,
        }
    }
}

impl ParserConfig {
    /// Create a new parser configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the encoder units-per-turn constant
    pub fn with_units_per_turn(mut self, units: f64) -> Self {
        self.units_per_turn = units;
        self
    }

    /// Builder method: set the timestamp format string
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Builder method: set the reward matching tolerance
    pub fn with_match_tolerance(mut self, tolerance: f64) -> Self {
        self.match_tolerance = tolerance;
        self
    }

    /// Builder method: set the position line marker
    pub fn with_position_marker(mut self, marker: impl Into<String>) -> Self {
        self.position_marker = marker.into();
        self
    }
}
