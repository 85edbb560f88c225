//! Log line classification and field extraction
//!
//! The rig writes space-delimited lines: two leading date/time tokens
//! followed by `key=value` pairs (position lines) or free-text reward
//! markers with trailing coordinates (reward lines). Classification is by
//! substring marker; field extraction is by key name, with missing fields
//! defaulting to zero.

use crate::config::ParserConfig;
use crate::types::{PositionSample, RewardEvent, RewardKind, Timestamp};

/// What a raw log line turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind {
    Position,
    Reward(RewardKind),
    Other,
}

/// Classify a raw line by its markers
pub(crate) fn classify(line: &str, config: &ParserConfig) -> LineKind {
    if line.contains(&config.position_marker) {
        LineKind::Position
    } else if line.contains(&config.reward_marker) {
        if line.contains(&config.delivered_marker) {
            LineKind::Reward(RewardKind::Delivered)
        } else if line.contains(&config.manual_marker) {
            LineKind::Reward(RewardKind::Manual)
        } else if line.contains(&config.positioned_marker) {
            LineKind::Reward(RewardKind::Automatic)
        } else {
            // reward chatter with no recognised sub-type
            LineKind::Other
        }
    } else {
        LineKind::Other
    }
}

/// Parse a position line into a sample
///
/// Returns `None` when the timestamp cannot be parsed; a line without a
/// usable timestamp cannot be placed on the trial timeline.
pub(crate) fn parse_position_line(line: &str, config: &ParserConfig) -> Option<PositionSample> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let timestamp = parse_timestamp(&tokens, &config.timestamp_format)?;

    let raw_theta = float_field(&tokens, "Theta");
    Some(PositionSample {
        timestamp,
        x: float_field(&tokens, "X"),
        z: float_field(&tokens, "Z"),
        heading_deg: (raw_theta / config.units_per_turn).to_degrees(),
        mx: float_field(&tokens, "MX"),
        my: float_field(&tokens, "MY"),
        gain_x: float_field(&tokens, "GainX"),
        gain_y: float_field(&tokens, "GainY"),
        fading: int_field(&tokens, "Fading"),
        realtime_gain_x: int_field(&tokens, "RealTimeGainX"),
        realtime_gain_y: int_field(&tokens, "RealTimeGainY"),
        dark: int_field(&tokens, "Dark"),
    })
}

/// Parse a reward line into an event
///
/// The lure coordinates are the last two tokens of the line (`X=..` `Z=..`).
pub(crate) fn parse_reward_line(
    line: &str,
    kind: RewardKind,
    config: &ParserConfig,
) -> Option<RewardEvent> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let timestamp = parse_timestamp(&tokens, &config.timestamp_format)?;
    if tokens.len() < 4 {
        return None;
    }

    Some(RewardEvent {
        timestamp,
        x: trailing_value(tokens[tokens.len() - 2]),
        z: trailing_value(tokens[tokens.len() - 1]),
        kind,
    })
}

/// Join the two leading tokens and parse them as a timestamp
fn parse_timestamp(tokens: &[&str], format: &str) -> Option<Timestamp> {
    if tokens.len() < 2 {
        return None;
    }
    let joined = format!("{} {}", tokens[0], tokens[1]);
    Timestamp::parse_from_str(&joined, format).ok()
}

/// Find the value of a `key=value` token by exact key name
fn field<'a>(tokens: &[&'a str], key: &str) -> Option<&'a str> {
    tokens.iter().find_map(|token| {
        let (k, v) = token.split_once('=')?;
        (k == key).then_some(v)
    })
}

fn float_field(tokens: &[&str], key: &str) -> f64 {
    field(tokens, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

fn int_field(tokens: &[&str], key: &str) -> i32 {
    field(tokens, key).and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Extract the numeric value after the last `=` of a token
fn trailing_value(token: &str) -> f64 {
    token
        .rsplit('=')
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}
