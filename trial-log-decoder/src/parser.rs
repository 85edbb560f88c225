//! Main parser API
//!
//! This module provides the primary interface for the library. [`LogParser`]
//! is the entry point: it reads one rig log file in a single synchronous
//! pass, classifies every line, and assembles the result into a [`Trial`].

use crate::config::ParserConfig;
use crate::line::{self, LineKind};
use crate::trial::Trial;
use crate::types::{ParseError, ParseStats, PositionSample, Result, RewardEvent};
use std::fs;
use std::path::Path;

/// The main parser struct - entry point for reading trial logs
pub struct LogParser {
    config: ParserConfig,
}

/// The output of one parse: the assembled trial plus line accounting
#[derive(Debug, Clone)]
pub struct ParsedLog {
    /// The reconstructed trial
    pub trial: Trial,
    /// Line accounting, including skipped malformed lines
    pub stats: ParseStats,
}

impl LogParser {
    /// Create a parser with the default rig configuration
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with an explicit configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Read and parse one trial log file
    ///
    /// # Example
    /// ```no_run
    /// use trial_log_decoder::LogParser;
    /// use std::path::Path;
    ///
    /// let parser = LogParser::new();
    /// let parsed = parser.parse_file(Path::new("trial_2021-03-01.txt")).unwrap();
    /// println!("duration: {:.1}s", parsed.trial.duration_secs());
    /// ```
    pub fn parse_file(&self, path: &Path) -> Result<ParsedLog> {
        log::info!("Reading trial log: {:?}", path);
        let content = fs::read_to_string(path)
            .map_err(|e| ParseError::ReadError(format!("{:?}: {}", path, e)))?;
        self.parse_str(&content)
    }

    /// Parse log content already held in memory
    pub fn parse_str(&self, content: &str) -> Result<ParsedLog> {
        let mut samples: Vec<PositionSample> = Vec::new();
        let mut rewards: Vec<RewardEvent> = Vec::new();
        let mut stats = ParseStats::default();

        for (idx, raw) in content.lines().enumerate() {
            stats.total_lines += 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match line::classify(line, &self.config) {
                LineKind::Position => match line::parse_position_line(line, &self.config) {
                    Some(sample) => {
                        samples.push(sample);
                        stats.position_lines += 1;
                    }
                    None => {
                        stats.malformed_lines += 1;
                        log::warn!("Skipping malformed position line {}: {}", idx + 1, line);
                    }
                },
                LineKind::Reward(kind) => {
                    match line::parse_reward_line(line, kind, &self.config) {
                        Some(event) => {
                            rewards.push(event);
                            stats.reward_lines += 1;
                        }
                        None => {
                            stats.malformed_lines += 1;
                            log::warn!("Skipping malformed reward line {}: {}", idx + 1, line);
                        }
                    }
                }
                LineKind::Other => {}
            }
        }

        if samples.is_empty() {
            return Err(ParseError::NoPositionData);
        }

        // Collapse duplicate timestamps, keeping the first sample of each,
        // then leave both series in ascending time order.
        let before = samples.len();
        samples.sort_by_key(|s| s.timestamp);
        samples.dedup_by_key(|s| s.timestamp);
        stats.duplicate_samples = before - samples.len();
        rewards.sort_by_key(|r| r.timestamp);

        log::info!(
            "Parsed {} position samples and {} reward events ({} malformed lines skipped, {} duplicates collapsed)",
            samples.len(),
            rewards.len(),
            stats.malformed_lines,
            stats.duplicate_samples
        );

        Ok(ParsedLog {
            trial: Trial::new(samples, rewards),
            stats,
        })
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RewardKind;

    fn position_line(time: &str, x: f64, z: f64) -> String {
        format!(
            "2021-03-01 {time} X={x:.2} Z={z:.2} Theta=0.0 S=0 MX=0.0 MY=0.0 \
             GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0"
        )
    }

    #[test]
    fn test_duplicate_timestamps_collapse_to_one() {
        let log = [
            position_line("10:00:01.000000", 0.0, 0.0),
            position_line("10:00:01.000000", 9.0, 9.0),
            position_line("10:00:02.000000", 1.0, 0.0),
        ]
        .join("\n");

        let parsed = LogParser::new().parse_str(&log).unwrap();
        assert_eq!(parsed.trial.samples().len(), 2);
        assert_eq!(parsed.stats.duplicate_samples, 1);
        assert_eq!(parsed.stats.position_lines, 3);
    }

    #[test]
    fn test_samples_come_out_time_sorted() {
        let log = [
            position_line("10:00:05.000000", 2.0, 0.0),
            position_line("10:00:01.000000", 0.0, 0.0),
            position_line("10:00:03.000000", 1.0, 0.0),
        ]
        .join("\n");

        let parsed = LogParser::new().parse_str(&log).unwrap();
        let times: Vec<_> = parsed
            .trial
            .samples()
            .iter()
            .map(|s| s.timestamp)
            .collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    #[test]
    fn test_malformed_lines_are_counted_not_fatal() {
        let log = [
            position_line("10:00:01.000000", 0.0, 0.0),
            "bad line with GainX marker but no timestamp".to_string(),
            "2021-03-01 10:00:02.000000 Reward_delivered".to_string(),
        ]
        .join("\n");

        let parsed = LogParser::new().parse_str(&log).unwrap();
        assert_eq!(parsed.stats.malformed_lines, 2);
        assert_eq!(parsed.trial.samples().len(), 1);
        assert!(parsed.trial.rewards().is_empty());
    }

    #[test]
    fn test_reward_kinds_are_separated() {
        let log = [
            position_line("10:00:01.000000", 0.0, 0.0),
            "2021-03-01 10:00:02.000000 RewardPositioned X=5.0 Z=5.0".to_string(),
            "2021-03-01 10:00:03.000000 Manual Reward_activated X=4.0 Z=4.0".to_string(),
            "2021-03-01 10:00:04.000000 Reward_delivered X=5.0 Z=5.0".to_string(),
        ]
        .join("\n");

        let parsed = LogParser::new().parse_str(&log).unwrap();
        let trial = &parsed.trial;
        assert_eq!(trial.rewards_of(RewardKind::Automatic).count(), 1);
        assert_eq!(trial.rewards_of(RewardKind::Manual).count(), 1);
        assert_eq!(trial.rewards_of(RewardKind::Delivered).count(), 1);
        assert_eq!(parsed.stats.reward_lines, 3);
    }

    #[test]
    fn test_empty_log_is_an_error() {
        let result = LogParser::new().parse_str("just chatter\nmore chatter\n");
        assert!(matches!(result, Err(ParseError::NoPositionData)));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = LogParser::new().parse_file(Path::new("/no/such/trial.log"));
        assert!(matches!(result, Err(ParseError::ReadError(_))));
    }
}
