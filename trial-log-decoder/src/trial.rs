//! Trial assembly and time alignment
//!
//! A [`Trial`] holds the deduplicated, time-sorted position samples and the
//! reward events of one log file, anchored to the earliest timestamp across
//! both series so every entry can be expressed as non-negative elapsed time.

use crate::types::{seconds_between, PositionSample, RewardEvent, RewardKind, Timestamp};

/// One reconstructed experimental trial
#[derive(Debug, Clone)]
pub struct Trial {
    start: Timestamp,
    samples: Vec<PositionSample>,
    rewards: Vec<RewardEvent>,
}

/// A row of the merged elapsed-time table
#[derive(Debug, Clone)]
pub struct TimelineEntry<'a> {
    /// Seconds since the trial anchor
    pub elapsed_secs: f64,
    /// The underlying record
    pub event: TrialEvent<'a>,
}

/// Either series of the merged table
#[derive(Debug, Clone, Copy)]
pub enum TrialEvent<'a> {
    Position(&'a PositionSample),
    Reward(&'a RewardEvent),
}

impl<'a> TrialEvent<'a> {
    /// Timestamp of the underlying record
    pub fn timestamp(&self) -> Timestamp {
        match self {
            TrialEvent::Position(sample) => sample.timestamp,
            TrialEvent::Reward(event) => event.timestamp,
        }
    }
}

impl Trial {
    /// Assemble a trial from already sorted and deduplicated series
    ///
    /// Invariant (upheld by the parser): `samples` is non-empty, strictly
    /// ascending in time, and `rewards` is sorted by time.
    pub(crate) fn new(samples: Vec<PositionSample>, rewards: Vec<RewardEvent>) -> Self {
        let start = match (samples.first(), rewards.first()) {
            (Some(s), Some(r)) => s.timestamp.min(r.timestamp),
            (Some(s), None) => s.timestamp,
            (None, Some(r)) => r.timestamp,
            (None, None) => Timestamp::MIN,
        };
        Self {
            start,
            samples,
            rewards,
        }
    }

    /// The trial anchor: the earliest timestamp of any event in the file
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Seconds from the trial anchor to `ts`
    pub fn elapsed_secs(&self, ts: Timestamp) -> f64 {
        seconds_between(self.start, ts)
    }

    /// Trial duration in seconds, measured over the position samples
    pub fn duration_secs(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => seconds_between(first.timestamp, last.timestamp),
            _ => 0.0,
        }
    }

    /// All position samples, ascending in time, one per timestamp
    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    /// All reward events, ascending in time
    pub fn rewards(&self) -> &[RewardEvent] {
        &self.rewards
    }

    /// Reward events of one category
    pub fn rewards_of(&self, kind: RewardKind) -> impl Iterator<Item = &RewardEvent> {
        self.rewards.iter().filter(move |r| r.kind == kind)
    }

    /// Positioned rewards (Automatic and Manual)
    pub fn positioned_rewards(&self) -> impl Iterator<Item = &RewardEvent> {
        self.rewards.iter().filter(|r| r.kind.is_positioned())
    }

    /// X coordinates of the trajectory, in time order
    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.x)
    }

    /// Z coordinates of the trajectory, in time order
    pub fn zs(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.z)
    }

    /// Heading angles in degrees, in time order
    pub fn headings(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.heading_deg)
    }

    /// Position samples with `from <= timestamp <= to`
    pub fn samples_in_span(&self, from: Timestamp, to: Timestamp) -> &[PositionSample] {
        let lo = self.samples.partition_point(|s| s.timestamp < from);
        let hi = self.samples.partition_point(|s| s.timestamp <= to);
        &self.samples[lo..hi.max(lo)]
    }

    /// Position samples whose elapsed time falls in `[from_secs, to_secs]`
    pub fn samples_between(&self, from_secs: f64, to_secs: f64) -> &[PositionSample] {
        let lo = self
            .samples
            .partition_point(|s| self.elapsed_secs(s.timestamp) < from_secs);
        let hi = self
            .samples
            .partition_point(|s| self.elapsed_secs(s.timestamp) <= to_secs);
        &self.samples[lo..hi.max(lo)]
    }

    /// Reward events whose elapsed time falls in `[from_secs, to_secs]`
    pub fn rewards_between(&self, from_secs: f64, to_secs: f64) -> &[RewardEvent] {
        let lo = self
            .rewards
            .partition_point(|r| self.elapsed_secs(r.timestamp) < from_secs);
        let hi = self
            .rewards
            .partition_point(|r| self.elapsed_secs(r.timestamp) <= to_secs);
        &self.rewards[lo..hi.max(lo)]
    }

    /// Merge both series into one elapsed-time-indexed table
    ///
    /// Rows are ordered by timestamp; a position sample sorts before a
    /// reward event sharing its timestamp.
    pub fn timeline(&self) -> Vec<TimelineEntry<'_>> {
        let mut entries = Vec::with_capacity(self.samples.len() + self.rewards.len());
        let mut pos = self.samples.iter().peekable();
        let mut rew = self.rewards.iter().peekable();

        loop {
            let event = match (pos.peek(), rew.peek()) {
                (Some(s), Some(r)) => {
                    if s.timestamp <= r.timestamp {
                        TrialEvent::Position(pos.next().unwrap())
                    } else {
                        TrialEvent::Reward(rew.next().unwrap())
                    }
                }
                (Some(_), None) => TrialEvent::Position(pos.next().unwrap()),
                (None, Some(_)) => TrialEvent::Reward(rew.next().unwrap()),
                (None, None) => break,
            };
            entries.push(TimelineEntry {
                elapsed_secs: self.elapsed_secs(event.timestamp()),
                event,
            });
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(secs: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_micro_opt(10, 0, secs, 0)
            .unwrap()
    }

    fn sample(secs: u32, x: f64, z: f64) -> PositionSample {
        PositionSample {
            timestamp: ts(secs),
            x,
            z,
            heading_deg: 0.0,
            mx: 0.0,
            my: 0.0,
            gain_x: 1.0,
            gain_y: 1.0,
            fading: 0,
            realtime_gain_x: 0,
            realtime_gain_y: 0,
            dark: 0,
        }
    }

    fn reward(secs: u32, x: f64, z: f64, kind: RewardKind) -> RewardEvent {
        RewardEvent {
            timestamp: ts(secs),
            x,
            z,
            kind,
        }
    }

    fn make_trial() -> Trial {
        Trial::new(
            vec![sample(5, 0.0, 0.0), sample(6, 1.0, 0.0), sample(8, 2.0, 0.0)],
            vec![
                reward(3, 5.0, 5.0, RewardKind::Automatic),
                reward(7, 5.0, 5.0, RewardKind::Delivered),
            ],
        )
    }

    #[test]
    fn test_anchor_is_earliest_of_either_series() {
        let trial = make_trial();
        // the first reward precedes the first position sample
        assert_eq!(trial.start(), ts(3));
        assert_eq!(trial.elapsed_secs(ts(5)), 2.0);
    }

    #[test]
    fn test_elapsed_times_are_non_negative() {
        let trial = make_trial();
        for entry in trial.timeline() {
            assert!(entry.elapsed_secs >= 0.0);
        }
    }

    #[test]
    fn test_duration_uses_position_samples() {
        let trial = make_trial();
        assert_eq!(trial.duration_secs(), 3.0);
    }

    #[test]
    fn test_timeline_is_sorted_and_complete() {
        let trial = make_trial();
        let timeline = trial.timeline();
        assert_eq!(timeline.len(), 5);
        for pair in timeline.windows(2) {
            assert!(pair[0].elapsed_secs <= pair[1].elapsed_secs);
        }
    }

    #[test]
    fn test_samples_between() {
        let trial = make_trial();
        // elapsed: samples at 2.0, 3.0, 5.0
        let span = trial.samples_between(2.5, 5.0);
        assert_eq!(span.len(), 2);
        assert_eq!(span[0].x, 1.0);
        assert_eq!(span[1].x, 2.0);
        assert!(trial.samples_between(10.0, 20.0).is_empty());
    }

    #[test]
    fn test_trajectory_accessors() {
        let trial = make_trial();
        let xs: Vec<f64> = trial.xs().collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
        assert_eq!(trial.zs().count(), 3);
        assert!(trial.headings().all(|h| h == 0.0));
    }

    #[test]
    fn test_rewards_between() {
        let trial = make_trial();
        // elapsed: rewards at 0.0 and 4.0
        let span = trial.rewards_between(0.0, 1.0);
        assert_eq!(span.len(), 1);
        assert_eq!(span[0].kind, RewardKind::Automatic);
    }
}
