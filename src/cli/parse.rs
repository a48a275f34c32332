//! CLI parse: clap types for f1-telget. No behavior beyond field mapping.

use crate::jobs::JobArgs;
use clap::Parser;
use std::path::PathBuf;

/// Fetch and save F1 telemetry data.
///
/// Jobs come from --json, or from --year/--race/--session/--driver when all
/// four are given; otherwise the details are asked for interactively.
#[derive(Parser, Debug)]
#[command(name = "f1-telget", version)]
#[command(about = "Fetch and save F1 telemetry data.")]
pub struct Cli {
    /// Path to a JSON file containing a list of configurations
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// The year of the session (e.g., 2022)
    #[arg(long)]
    pub year: Option<i32>,

    /// The name of the Grand Prix (e.g., 'Saudi Arabia') or its round number
    #[arg(long)]
    pub race: Option<String>,

    /// Session type: R, Q, S, SQ, FP1, FP2, FP3, or a session number 1-5
    #[arg(long)]
    pub session: Option<String>,

    /// Three-letter driver abbreviation (e.g., 'ALO')
    #[arg(long)]
    pub driver: Option<String>,

    /// Directory the CSV files are written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Response cache directory
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always fetch from the provider; neither read nor write the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug-level logging, mirrored to stderr
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Plain summary output without colors
    #[arg(long)]
    pub no_color: bool,

    /// Exit with status 1 when any job failed
    #[arg(long)]
    pub fail_on_error: bool,
}

impl Cli {
    pub fn job_args(&self) -> JobArgs {
        JobArgs {
            json: self.json.clone(),
            year: self.year,
            race: self.race.clone(),
            session: self.session.clone(),
            driver: self.driver.clone(),
        }
    }
}
