//! Trial Log Reader CLI Application
//!
//! This is the command-line interface for the trial log reader. It uses the
//! trial-log-decoder library and adds:
//! - Console summary statistics for one experimental trial
//! - Reward delivery latency and path tortuosity reporting
//! - JSON export of the summary
//! - Frame-series export for the animation collaborator

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use trial_log_decoder::{collect_frames, metrics, LogParser};

mod config;
mod report;

/// Trial Log Reader - Parse and analyse rig trial logs
#[derive(Parser, Debug)]
#[command(name = "trial-log-cli")]
#[command(about = "Parse and analyse VR rig trial logs", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the trial log file to analyse
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write the per-window frame series as JSON to this file
    #[arg(long, value_name = "FILE")]
    frames: Option<PathBuf>,

    /// Playback start in seconds from trial onset
    #[arg(long, value_name = "SECONDS")]
    start: Option<f64>,

    /// Playback window length in seconds
    #[arg(long, value_name = "SECONDS")]
    window: Option<f64>,

    /// Playback step between frames in seconds
    #[arg(long, value_name = "SECONDS")]
    step: Option<f64>,

    /// Playback duration in seconds
    #[arg(long, value_name = "SECONDS")]
    duration: Option<f64>,

    /// Spatial tolerance when matching deliveries to positioned rewards
    #[arg(long, value_name = "UNITS")]
    tolerance: Option<f64>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Trial Log Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", trial_log_decoder::VERSION);

    // Load the config file if given, then let CLI flags override it
    let mut app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };
    apply_overrides(&mut app_config, &args);

    let log_path = match args.log.clone().or_else(|| app_config.input.file.clone()) {
        Some(path) => path,
        None => {
            // No arguments - show help
            println!("Trial Log Reader - No input specified");
            println!("\nQuick Start:");
            println!("  trial-log-cli --log trial_2021-03-01.txt");
            println!("  trial-log-cli --log trial.txt --frames frames.json");
            println!("\nFor a persistent setup:");
            println!("  trial-log-cli --config config.toml");
            println!("\nUse --help for more options");
            return Ok(());
        }
    };

    let json = matches!(app_config.output.format, config::OutputFormat::Json);
    analyse_trial(&log_path, &app_config, json)
}

/// Parse the log and produce all requested outputs
fn analyse_trial(log_path: &PathBuf, app_config: &config::AppConfig, json: bool) -> Result<()> {
    let parser_config = app_config.parser.to_parser_config();
    let tolerance = parser_config.match_tolerance;
    let parser = LogParser::with_config(parser_config);

    let parsed = parser
        .parse_file(log_path)
        .with_context(|| format!("Failed to parse trial log: {:?}", log_path))?;

    let deliveries = metrics::pair_deliveries(&parsed.trial, tolerance);
    let summary = report::TrialSummary::build(&parsed.trial, &parsed.stats, &deliveries);

    if json {
        report::write_summary_json(io::stdout().lock(), &summary)?;
        println!();
    } else {
        report::print_summary(&summary);
    }

    if let Some(frames_path) = &app_config.output.frames_file {
        let playback = &app_config.playback;
        log::info!(
            "Collecting frames: start {}s, window {}s, step {}s, duration {}s",
            playback.start_secs,
            playback.window_secs,
            playback.step_secs,
            playback.duration_secs
        );
        let frames = collect_frames(
            &parsed.trial,
            playback.start_secs,
            playback.window_secs,
            playback.step_secs,
            playback.duration_secs,
        );
        report::write_frames(frames_path, &frames)?;
        if !json {
            println!("\n✓ Wrote {} frames to {:?}", frames.len(), frames_path);
        }
    }

    Ok(())
}

/// CLI flags take precedence over the config file
fn apply_overrides(app_config: &mut config::AppConfig, args: &Args) {
    if let Some(tolerance) = args.tolerance {
        app_config.parser.match_tolerance = Some(tolerance);
    }
    if let Some(start) = args.start {
        app_config.playback.start_secs = start;
    }
    if let Some(window) = args.window {
        app_config.playback.window_secs = window;
    }
    if let Some(step) = args.step {
        app_config.playback.step_secs = step;
    }
    if let Some(duration) = args.duration {
        app_config.playback.duration_secs = duration;
    }
    if let Some(frames) = &args.frames {
        app_config.output.frames_file = Some(frames.clone());
    }
    if args.json {
        app_config.output.format = config::OutputFormat::Json;
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
