//! CLI route: run context. Loads configuration, applies flag overrides and
//! hands the resolved jobs to the batch driver.

use crate::batch::{BatchDriver, BatchSummary};
use crate::cli::parse::Cli;
use crate::config::{ConfigLoader, TelgetConfig};
use crate::error::TelgetError;
use crate::export::TelemetryWriter;
use crate::jobs::{resolve_jobs, JobSource, Prompter};
use crate::provider::{HttpCache, OpenF1Client};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime context for CLI execution: the loaded configuration.
pub struct RunContext {
    config: TelgetConfig,
}

impl RunContext {
    /// Load configuration from `config_path`, or from the layered defaults
    /// rooted at the working directory.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, TelgetError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(Path::new("."))?,
        };
        Self::from_config(config)
    }

    pub fn from_config(config: TelgetConfig) -> Result<Self, TelgetError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            TelgetError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(Self { config })
    }

    /// Cache directory after flags, or None when caching is off.
    pub fn cache_dir(&self, cli: &Cli) -> Option<PathBuf> {
        if cli.no_cache || !self.config.cache.enabled {
            return None;
        }
        Some(
            cli.cache_dir
                .clone()
                .unwrap_or_else(|| self.config.cache.path.clone()),
        )
    }

    pub fn output_dir(&self, cli: &Cli) -> PathBuf {
        cli.output_dir
            .clone()
            .unwrap_or_else(|| self.config.output.dir.clone())
    }

    /// Resolve jobs and run them. Progress goes to `out`.
    pub fn execute<W: Write>(
        &self,
        cli: &Cli,
        prompter: &mut dyn Prompter,
        out: &mut W,
    ) -> Result<BatchSummary, TelgetError> {
        let cache = match self.cache_dir(cli) {
            Some(dir) => {
                let cache = HttpCache::enable(&dir)?;
                writeln!(out, "Cache enabled at: {}", dir.display())?;
                cache
            }
            None => {
                info!("response cache disabled");
                HttpCache::disabled()
            }
        };

        let source = JobSource::select(&cli.job_args());
        let jobs = resolve_jobs(&source, prompter, out)?;

        let provider = OpenF1Client::new(&self.config.provider, cache)?;
        let writer = TelemetryWriter::new(self.output_dir(cli));
        let driver = BatchDriver::new(provider, writer);

        let rt = tokio::runtime::Runtime::new().map_err(|e| {
            TelgetError::ProviderError(format!("Failed to create runtime: {}", e))
        })?;
        rt.block_on(driver.run(&jobs, out))
    }
}
