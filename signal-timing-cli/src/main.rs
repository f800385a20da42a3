//! Signal Timing CLI Application
//!
//! This is the command-line interface for the signal-timing library.
//! It adds:
//! - Text and JSON reports of decoded DAT controller images
//! - Parallel scanning of directories of DAT files
//! - Corridor files (TOML) for offset optimization and signal states

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod report;
mod scan;

use report::{OptimizationReport, ScanRow, SignalReport, SummaryReport};

/// Signal Timing - Inspect controller DAT files and optimize green waves
#[derive(Parser, Debug)]
#[command(name = "signal-timing")]
#[command(about = "Decode traffic-signal controller DAT files and optimize corridor offsets", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode one DAT file and print its report
    Inspect {
        /// DAT file to decode
        file: PathBuf,

        /// Emit JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decode every DAT file below a directory
    Scan {
        /// Directory to search recursively
        dir: PathBuf,

        /// Emit JSON instead of one line per file
        #[arg(long)]
        json: bool,
    },

    /// Search corridor offsets for forward, reverse and balanced green waves
    Optimize {
        /// Corridor file (corridor.toml)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Override the corridor speed (km/h)
        #[arg(long)]
        speed: Option<f64>,

        /// Emit JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Print the light of every intersection at a point in time
    Signals {
        /// Corridor file (corridor.toml)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Time in seconds on the shared corridor clock
        #[arg(long, value_name = "SECONDS")]
        at: f64,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Signal Timing CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using signal-timing library v{}", signal_timing::VERSION);

    match args.command {
        Command::Inspect { file, json, output } => inspect(&file, json, output),
        Command::Scan { dir, json } => scan_dir(&dir, json),
        Command::Optimize { config, speed, json } => optimize(&config, speed, json),
        Command::Signals { config, at } => signals(&config, at),
    }
}

/// Decode one file and print or save its report
fn inspect(file: &Path, json: bool, output: Option<PathBuf>) -> Result<()> {
    let summary = signal_timing::DatDecoder::decode_file(file)
        .with_context(|| format!("Failed to decode DAT file: {:?}", file))?;

    let text = if json {
        serde_json::to_string_pretty(&summary)?
    } else {
        SummaryReport(&summary).to_string()
    };

    match output {
        Some(path) => {
            fs::write(&path, text).with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Decode a directory of files, one row each
fn scan_dir(dir: &Path, json: bool) -> Result<()> {
    let rows = scan::scan_directory(dir)?;
    let failed = rows.iter().filter(|(_, outcome)| outcome.is_err()).count();

    if json {
        let values: Vec<serde_json::Value> = rows
            .iter()
            .map(|(path, outcome)| match outcome {
                Ok(summary) => serde_json::json!({ "path": path.display().to_string(), "summary": summary }),
                Err(e) => serde_json::json!({ "path": path.display().to_string(), "error": e }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for (path, outcome) in &rows {
            println!("{}", ScanRow { path, outcome });
        }
        println!("\n{} files, {} failed", rows.len(), failed);
    }
    Ok(())
}

/// Run the optimizer over a corridor file
fn optimize(config_path: &Path, speed: Option<f64>, json: bool) -> Result<()> {
    log::info!("Loading corridor from: {:?}", config_path);
    let corridor = config::load_config(config_path)?;
    let speed_kmh = speed.unwrap_or(corridor.corridor.speed_kmh);

    let optimizer = signal_timing::OffsetOptimizer::with_config(corridor.optimizer.clone())
        .context("Invalid [optimizer] settings")?;
    let result = optimizer
        .optimize(&corridor.intersections, speed_kmh)
        .with_context(|| format!("Optimization failed for {:?}", config_path))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!(
            "{}",
            OptimizationReport {
                result: &result,
                corridor: &corridor.intersections,
            }
        );
    }
    Ok(())
}

/// Print signal states of a corridor at one instant
fn signals(config_path: &Path, at: f64) -> Result<()> {
    let corridor = config::load_config(config_path)?;
    print!(
        "{}",
        SignalReport {
            corridor: &corridor.intersections,
            time_s: at,
            yellow_s: corridor.corridor.yellow_s,
        }
    );
    Ok(())
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
        .format(|buf, record| writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args()))
        .init();
}
