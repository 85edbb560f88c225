//! Windowed playback frames for the visualization layer
//!
//! The animation collaborator consumes per-window snapshots of the trial:
//! the trajectory inside a sliding time window, the subject's head pose, and
//! the reward markers currently visible in the arena. A marker appears when
//! a lure is positioned and disappears again once the matching delivery is
//! seen; markers persist across frames in between.

use crate::trial::Trial;
use crate::types::RewardKind;
use serde::Serialize;

/// The subject's pose at the leading edge of the window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadPose {
    pub x: f64,
    pub z: f64,
    pub heading_deg: f64,
}

/// One snapshot handed to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// Seconds since trial onset at the window start
    pub elapsed_secs: f64,
    /// (x, z) trajectory points inside the window
    pub path: Vec<(f64, f64)>,
    /// Pose at the most recent sample in the window, if any
    pub head: Option<HeadPose>,
    /// Lure locations currently awaiting collection
    pub reward_markers: Vec<(f64, f64)>,
}

/// Stateful cursor that replays a trial window by window
pub struct TrialPlayback<'a> {
    trial: &'a Trial,
    cursor_secs: f64,
    window_secs: f64,
    tolerance: f64,
    active_markers: Vec<(f64, f64)>,
}

impl<'a> TrialPlayback<'a> {
    /// Start a playback at `start_secs` with the given window length
    pub fn new(trial: &'a Trial, start_secs: f64, window_secs: f64) -> Self {
        Self {
            trial,
            cursor_secs: start_secs,
            window_secs,
            tolerance: 0.0,
            active_markers: Vec::new(),
        }
    }

    /// Builder method: spatial tolerance used when a delivery clears its
    /// marker
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Current cursor position in seconds since trial onset
    pub fn elapsed_secs(&self) -> f64 {
        self.cursor_secs
    }

    /// True once the cursor has moved past the last position sample
    pub fn finished(&self) -> bool {
        match self.trial.samples().last() {
            Some(s) => self.cursor_secs > self.trial.elapsed_secs(s.timestamp),
            None => true,
        }
    }

    /// Move the cursor forward
    pub fn advance(&mut self, dt_secs: f64) {
        self.cursor_secs += dt_secs;
    }

    /// Produce the snapshot for the current window and update the marker set
    pub fn frame(&mut self) -> Frame {
        let from = self.cursor_secs;
        let to = self.cursor_secs + self.window_secs;

        let span = self.trial.samples_between(from, to);
        let path: Vec<(f64, f64)> = span.iter().map(|s| s.location()).collect();
        let head = span.last().map(|s| HeadPose {
            x: s.x,
            z: s.z,
            heading_deg: s.heading_deg,
        });

        let window_rewards = self.trial.rewards_between(from, to);

        // lures positioned in this window light up first...
        for event in window_rewards.iter().filter(|r| r.kind.is_positioned()) {
            let already = self
                .active_markers
                .iter()
                .any(|&(mx, mz)| close(mx, mz, event.x, event.z, self.tolerance));
            if !already {
                self.active_markers.push((event.x, event.z));
            }
        }
        // ...then deliveries clear the matching marker
        for event in window_rewards
            .iter()
            .filter(|r| r.kind == RewardKind::Delivered)
        {
            self.active_markers
                .retain(|&(mx, mz)| !close(mx, mz, event.x, event.z, self.tolerance));
        }

        Frame {
            elapsed_secs: self.cursor_secs,
            path,
            head,
            reward_markers: self.active_markers.clone(),
        }
    }
}

fn close(ax: f64, az: f64, bx: f64, bz: f64, tolerance: f64) -> bool {
    (ax - bx).abs() <= tolerance && (az - bz).abs() <= tolerance
}

/// Collect a fixed-step frame series, the shape exported for offline
/// rendering
pub fn collect_frames(
    trial: &Trial,
    start_secs: f64,
    window_secs: f64,
    step_secs: f64,
    duration_secs: f64,
) -> Vec<Frame> {
    if step_secs <= 0.0 {
        log::warn!("Non-positive playback step {}, no frames produced", step_secs);
        return Vec::new();
    }

    let mut playback = TrialPlayback::new(trial, start_secs, window_secs);
    let end = start_secs + duration_secs;
    let mut frames = Vec::new();
    while playback.elapsed_secs() <= end && !playback.finished() {
        frames.push(playback.frame());
        playback.advance(step_secs);
    }
    frames
}
