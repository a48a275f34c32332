//! f1-telget CLI Binary
//!
//! Fetches F1 session telemetry for each requested job and saves it as CSV.

use clap::Parser;
use std::io;
use std::path::Path;
use std::process;
use telget::cli::{format_batch_summary, map_error, Cli, RunContext};
use telget::config::ConfigLoader;
use telget::jobs::TerminalPrompter;
use telget::logging::{apply_env_overrides, init_logging, LoggingConfig};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("f1-telget starting");

    let context = match RunContext::new(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    let mut stdout = io::stdout();
    match context.execute(&cli, &mut TerminalPrompter, &mut stdout) {
        Ok(summary) => {
            if !summary.is_empty() {
                println!("{}", format_batch_summary(&summary, !cli.no_color));
            }
            if summary.failed() > 0 && cli.fail_on_error {
                info!(failed = summary.failed(), "finished with failed jobs");
                process::exit(1);
            }
            info!(failed = summary.failed(), "finished");
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from config files, environment and CLI args.
/// Precedence: CLI flags, then `TELGET_LOG*` variables, then config files.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(Path::new("."))
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };
    apply_env_overrides(&mut config);

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
        // An explicit --log-output value still wins below.
        if config.output == "file" {
            config.output = "file+stderr".to_string();
        }
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if cli.no_color {
        config.color = false;
    }

    let output_uses_file = config.output == "file" || config.output == "file+stderr";
    if config.enabled && output_uses_file {
        if let Ok(path) =
            telget::logging::resolve_log_file_path(cli.log_file.clone(), config.file.clone())
        {
            config.file = Some(path);
        }
    } else if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
