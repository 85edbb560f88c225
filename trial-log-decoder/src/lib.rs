//! Trial Log Decoder Library
//!
//! A stateless, reusable library for reading the text logs produced by a
//! virtual-reality rodent-tracking rig and reconstructing one experimental
//! trial: the subject's trajectory plus the reward events around it.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on reconstruction:
//! - Classifies raw log lines and extracts their typed fields
//! - Deduplicates and time-sorts position samples, anchors everything to
//!   the earliest timestamp in the file
//! - Reconciles delivered rewards with their originating positioned rewards
//!   and derives latency and path tortuosity
//! - Serves windowed trajectory/marker frames to a visualization layer
//!
//! The library does NOT:
//! - Render anything (plotting lives with the visualization collaborator)
//! - Format reports or write output files
//!
//! All higher-level functionality is in the application layer
//! (trial-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use trial_log_decoder::{metrics, LogParser, RewardKind};
//! use std::path::Path;
//!
//! let parser = LogParser::new();
//! let parsed = parser.parse_file(Path::new("trial_2021-03-01.txt")).unwrap();
//!
//! let trial = &parsed.trial;
//! println!("Trial duration(s): {}", trial.duration_secs());
//! println!(
//!     "Rewards delivered: {}",
//!     trial.rewards_of(RewardKind::Delivered).count()
//! );
//!
//! for delivery in metrics::pair_deliveries(trial, 0.0) {
//!     println!(
//!         "latency {:.2}s, tortuosity {:?}",
//!         delivery.latency_secs, delivery.tortuosity
//!     );
//! }
//! ```

// Public modules
pub mod config;
pub mod metrics;
pub mod parser;
pub mod playback;
pub mod trial;
pub mod types;

// Re-export main types for convenience
pub use config::{ParserConfig, ROTARY_ENCODER_UNITS_PER_TURN, TIMESTAMP_FORMAT};
pub use metrics::{pair_deliveries, segment_tortuosity, RewardDelivery};
pub use parser::{LogParser, ParsedLog};
pub use playback::{collect_frames, Frame, HeadPose, TrialPlayback};
pub use trial::{TimelineEntry, Trial, TrialEvent};
pub use types::{
    seconds_between, ParseError, ParseStats, PositionSample, Result, RewardEvent, RewardKind,
    Timestamp,
};

// Internal modules (not exposed in public API)
mod line;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
