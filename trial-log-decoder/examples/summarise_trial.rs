//! Standalone trial summary tool
//!
//! Parses one rig log file and prints the trial summary without going
//! through the full CLI application.
//!
//! Usage:
//!   summarise_trial <trial_log.txt> [--tolerance <units>] [--verbose]
//!
//! Example:
//!   summarise_trial trial_2021-03-01.txt --tolerance 0.1

use std::env;
use std::path::PathBuf;
use trial_log_decoder::{metrics, LogParser, ParserConfig, RewardKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <trial_log.txt> [--tolerance <units>]", args[0]);
        std::process::exit(1);
    }

    let log_file = PathBuf::from(&args[1]);
    let mut tolerance = 0.0f64;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--tolerance" => {
                i += 1;
                if i < args.len() {
                    tolerance = args[i].parse()?;
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    let parser = LogParser::with_config(ParserConfig::new().with_match_tolerance(tolerance));
    let parsed = parser.parse_file(&log_file)?;
    let trial = &parsed.trial;

    let manual = trial.rewards_of(RewardKind::Manual).count();
    let automatic = trial.rewards_of(RewardKind::Automatic).count();
    let delivered = trial.rewards_of(RewardKind::Delivered).count();

    let min_x = trial.xs().fold(f64::INFINITY, f64::min);
    let max_x = trial.xs().fold(f64::NEG_INFINITY, f64::max);
    let min_z = trial.zs().fold(f64::INFINITY, f64::min);
    let max_z = trial.zs().fold(f64::NEG_INFINITY, f64::max);

    println!("=== TRIAL SUMMARY ===");
    println!("Log file: {:?}", log_file);
    println!("Trial duration(s): {:.3}", trial.duration_secs());
    println!("Position samples: {}", trial.samples().len());
    println!(
        "Arena bounds: x [{:.2}, {:.2}], z [{:.2}, {:.2}]",
        min_x, max_x, min_z, max_z
    );
    println!("Total number of rewards: {}", manual + automatic);
    println!("\tManual rewards: {}", manual);
    println!("\tAutomatic rewards: {}", automatic);
    println!("Number of rewards delivered: {}", delivered);

    let deliveries = metrics::pair_deliveries(trial, tolerance);
    println!("\nMatched deliveries: {}", deliveries.len());
    for delivery in &deliveries {
        match delivery.tortuosity {
            Some(t) => println!(
                "  ({:.2}, {:.2}) latency {:.3}s tortuosity {:.3}",
                delivery.delivered.x, delivery.delivered.z, delivery.latency_secs, t
            ),
            None => println!(
                "  ({:.2}, {:.2}) latency {:.3}s tortuosity n/a",
                delivery.delivered.x, delivery.delivered.z, delivery.latency_secs
            ),
        }
    }

    if parsed.stats.malformed_lines > 0 {
        println!(
            "\n⚠ {} malformed lines were skipped (run with RUST_LOG=warn for details)",
            parsed.stats.malformed_lines
        );
    }

    Ok(())
}
