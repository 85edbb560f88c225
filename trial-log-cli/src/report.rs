//! Summary report generation
//!
//! Builds the trial statistics the researcher sees on the console and the
//! JSON documents consumed downstream (summary plus the frame series for
//! the visualization collaborator).

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use trial_log_decoder::{Frame, ParseStats, RewardDelivery, RewardKind, Trial};

/// Everything the summary report shows, in exportable form
#[derive(Debug, Clone, Serialize)]
pub struct TrialSummary {
    /// Trial start as written by the rig logger
    pub trial_start: String,
    pub duration_secs: f64,
    pub position_samples: usize,
    pub total_rewards: usize,
    pub manual_rewards: usize,
    pub automatic_rewards: usize,
    pub delivered_rewards: usize,
    pub matched_deliveries: usize,
    /// Latency of each matched delivery, in pairing order
    pub latencies_secs: Vec<f64>,
    /// Tortuosity of each matched delivery with a non-degenerate segment
    pub tortuosities: Vec<f64>,
    pub malformed_lines: usize,
    pub duplicate_samples: usize,
}

impl TrialSummary {
    pub fn build(trial: &Trial, stats: &ParseStats, deliveries: &[RewardDelivery]) -> Self {
        let manual = trial.rewards_of(RewardKind::Manual).count();
        let automatic = trial.rewards_of(RewardKind::Automatic).count();
        Self {
            trial_start: trial.start().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            duration_secs: trial.duration_secs(),
            position_samples: trial.samples().len(),
            total_rewards: manual + automatic,
            manual_rewards: manual,
            automatic_rewards: automatic,
            delivered_rewards: trial.rewards_of(RewardKind::Delivered).count(),
            matched_deliveries: deliveries.len(),
            latencies_secs: deliveries.iter().map(|d| d.latency_secs).collect(),
            tortuosities: deliveries.iter().filter_map(|d| d.tortuosity).collect(),
            malformed_lines: stats.malformed_lines,
            duplicate_samples: stats.duplicate_samples,
        }
    }
}

/// Print the summary in the console format
pub fn print_summary(summary: &TrialSummary) {
    println!("═══════════════════════════════════════════════");
    println!("  Trial Log Reader - Summary");
    println!("═══════════════════════════════════════════════\n");

    println!("📄 Trial start: {}", summary.trial_start);
    println!("Trial duration(s): {:.3}", summary.duration_secs);
    println!("Position samples: {}", summary.position_samples);

    println!("\n📊 Rewards:");
    println!("Total number of rewards: {}", summary.total_rewards);
    println!("\tManual rewards: {}", summary.manual_rewards);
    println!("\tAutomatic rewards: {}", summary.automatic_rewards);
    println!("Number of rewards delivered: {}", summary.delivered_rewards);
    println!("Matched deliveries: {}", summary.matched_deliveries);

    if !summary.latencies_secs.is_empty() {
        println!(
            "\nDelivery latency(s): {}",
            format_list(&summary.latencies_secs)
        );
    }
    if !summary.tortuosities.is_empty() {
        println!("Path tortuosity:     {}", format_list(&summary.tortuosities));
    }

    if summary.malformed_lines > 0 || summary.duplicate_samples > 0 {
        println!(
            "\n⚠ Skipped {} malformed lines, collapsed {} duplicate samples",
            summary.malformed_lines, summary.duplicate_samples
        );
    }
}

fn format_list(values: &[f64]) -> String {
    let formatted: Vec<String> = values.iter().map(|v| format!("{:.3}", v)).collect();
    format!("[{}]", formatted.join(", "))
}

/// Write the summary as pretty JSON
pub fn write_summary_json<W: std::io::Write>(writer: W, summary: &TrialSummary) -> Result<()> {
    serde_json::to_writer_pretty(writer, summary).context("Failed to serialize summary")?;
    Ok(())
}

/// Write the frame series for the visualization collaborator
pub fn write_frames(path: &Path, frames: &[Frame]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create frames file: {:?}", path))?;
    serde_json::to_writer(BufWriter::new(file), frames)
        .with_context(|| format!("Failed to write frames file: {:?}", path))?;
    log::info!("Wrote {} frames to {:?}", frames.len(), path);
    Ok(())
}
