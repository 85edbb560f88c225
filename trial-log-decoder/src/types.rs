//! Core types for the trial log decoder library
//!
//! This module defines the records the parser emits when reading a rig log
//! file. The parser is stateless and only reconstructs what the rig wrote -
//! it does not compute metrics or drive any visualization.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the decoder
///
/// The rig logger writes local wall-clock times with no timezone designator,
/// so timestamps stay naive end to end.
pub type Timestamp = NaiveDateTime;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while reading a trial log
///
/// Malformed lines are deliberately NOT errors: the rig interleaves its
/// position stream with status chatter, so unparseable lines are skipped,
/// counted in [`ParseStats`] and reported through the `log` facade.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read log file: {0}")]
    ReadError(String),

    #[error("No position samples found in log")]
    NoPositionData,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// One sample of the subject's position on the virtual track
///
/// Produced from a position line of the log. The heading is derived from the
/// raw rotary-encoder count using the rig's units-per-turn constant; the
/// remaining fields are instrument calibration values carried through
/// verbatim. Samples are uniquely keyed by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSample {
    /// Wall-clock time the sample was logged
    pub timestamp: Timestamp,
    /// X position in the virtual environment
    pub x: f64,
    /// Z position in the virtual environment
    pub z: f64,
    /// Heading angle in degrees, derived from the rotary encoder count
    pub heading_deg: f64,
    /// Motor offset X
    pub mx: f64,
    /// Motor offset Y
    pub my: f64,
    /// Display gain X
    pub gain_x: f64,
    /// Display gain Y
    pub gain_y: f64,
    /// Fading state of the visual stimulus
    pub fading: i32,
    /// Real-time gain X flag
    pub realtime_gain_x: i32,
    /// Real-time gain Y flag
    pub realtime_gain_y: i32,
    /// Dark-mode flag (stimulus blanked)
    pub dark: i32,
}

impl PositionSample {
    /// The (x, z) location of this sample
    pub fn location(&self) -> (f64, f64) {
        (self.x, self.z)
    }
}

/// Category of a reward event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardKind {
    /// A lure was positioned in the environment by the task logic
    Automatic,
    /// A lure was positioned by the experimenter
    Manual,
    /// The subject collected a previously positioned lure
    Delivered,
}

impl RewardKind {
    /// True for the two positioned variants (Automatic and Manual)
    pub fn is_positioned(&self) -> bool {
        matches!(self, RewardKind::Automatic | RewardKind::Manual)
    }

    /// True for Delivered
    pub fn is_delivered(&self) -> bool {
        matches!(self, RewardKind::Delivered)
    }
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewardKind::Automatic => write!(f, "Automatic"),
            RewardKind::Manual => write!(f, "Manual"),
            RewardKind::Delivered => write!(f, "Delivered"),
        }
    }
}

/// A reward event recorded by the rig
///
/// Identity for matching a delivery to its originating positioned reward is
/// (x, z) spatial coincidence, never time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardEvent {
    /// Wall-clock time the event was logged
    pub timestamp: Timestamp,
    /// X position of the lure
    pub x: f64,
    /// Z position of the lure
    pub z: f64,
    /// Event category
    pub kind: RewardKind,
}

impl RewardEvent {
    /// Check whether two events refer to the same lure location
    ///
    /// A tolerance of zero requires exact coordinate equality, which holds
    /// for events parsed from the same log text.
    pub fn matches_location(&self, other: &RewardEvent, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.z - other.z).abs() <= tolerance
    }
}

/// Line accounting for one parsed log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Total lines read from the file
    pub total_lines: usize,
    /// Lines parsed as position samples
    pub position_lines: usize,
    /// Lines parsed as reward events
    pub reward_lines: usize,
    /// Position or reward lines skipped because a field failed to parse
    pub malformed_lines: usize,
    /// Position samples collapsed because they shared a timestamp
    pub duplicate_samples: usize,
}

/// Elapsed seconds from `earlier` to `later`
pub fn seconds_between(earlier: Timestamp, later: Timestamp) -> f64 {
    let delta = later - earlier;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(secs: u32, micros: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_micro_opt(10, 0, secs, micros)
            .unwrap()
    }

    #[test]
    fn test_reward_kind_predicates() {
        assert!(RewardKind::Automatic.is_positioned());
        assert!(RewardKind::Manual.is_positioned());
        assert!(!RewardKind::Delivered.is_positioned());
        assert!(RewardKind::Delivered.is_delivered());
    }

    #[test]
    fn test_location_matching() {
        let positioned = RewardEvent {
            timestamp: ts(0, 0),
            x: 5.0,
            z: 5.0,
            kind: RewardKind::Automatic,
        };
        let delivered = RewardEvent {
            timestamp: ts(2, 0),
            x: 5.0,
            z: 5.0,
            kind: RewardKind::Delivered,
        };
        assert!(positioned.matches_location(&delivered, 0.0));

        let elsewhere = RewardEvent {
            x: 5.1,
            ..delivered.clone()
        };
        assert!(!positioned.matches_location(&elsewhere, 0.0));
        assert!(positioned.matches_location(&elsewhere, 0.2));
    }

    #[test]
    fn test_seconds_between() {
        assert_eq!(seconds_between(ts(0, 0), ts(2, 500_000)), 2.5);
        assert_eq!(seconds_between(ts(1, 0), ts(1, 0)), 0.0);
    }
}
