//! Batch driver: fetch, transform and write each job in turn.
//!
//! A failing job is reported and skipped; it never stops the batch.

use crate::error::TelgetError;
use crate::export::TelemetryWriter;
use crate::job::{JobConfig, JobSpec};
use crate::provider::TelemetryProvider;
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, info_span, warn, Instrument};

const SEPARATOR_WIDTH: usize = 50;

/// What happened to one job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Saved(PathBuf),
    /// The driver has no laps or no samples in the session.
    NoData,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub label: String,
    pub outcome: JobOutcome,
}

/// Outcomes of a whole batch, in job order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub reports: Vec<JobReport>,
}

impl BatchSummary {
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::Saved(_)))
    }

    pub fn no_data(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::NoData))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&JobOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Runs jobs sequentially against one provider.
pub struct BatchDriver<P> {
    provider: P,
    writer: TelemetryWriter,
}

impl<P: TelemetryProvider> BatchDriver<P> {
    pub fn new(provider: P, writer: TelemetryWriter) -> Self {
        Self { provider, writer }
    }

    /// Process every job, printing progress to `out`.
    pub async fn run<W: Write>(
        &self,
        jobs: &[JobSpec],
        out: &mut W,
    ) -> Result<BatchSummary, TelgetError> {
        let mut summary = BatchSummary::default();
        if jobs.is_empty() {
            writeln!(out, "\nNo configurations to process. Exiting.")?;
            return Ok(summary);
        }

        info!(
            jobs = jobs.len(),
            provider = self.provider.provider_name(),
            "starting batch"
        );
        for (index, spec) in jobs.iter().enumerate() {
            writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
            let span = info_span!("job", index = index + 1);
            let outcome = match self.run_job(spec, out).instrument(span).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let message = format!("{:#}", e);
                    warn!(job = %spec, error = %message, "job failed");
                    writeln!(out, "An error occurred for configuration {}: {}", spec, message)?;
                    writeln!(
                        out,
                        "Please check the configuration details and your internet connection.\n"
                    )?;
                    JobOutcome::Failed(message)
                }
            };
            summary.reports.push(JobReport {
                label: label_for(spec),
                outcome,
            });
        }

        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        writeln!(out, "All configurations processed.")?;
        info!(
            saved = summary.saved(),
            no_data = summary.no_data(),
            failed = summary.failed(),
            "batch finished"
        );
        Ok(summary)
    }

    async fn run_job<W: Write>(&self, spec: &JobSpec, out: &mut W) -> anyhow::Result<JobOutcome> {
        let job = JobConfig::from_spec(spec)?;

        writeln!(
            out,
            "Loading data for: {} {} GP - Session: {} - Driver: {}",
            job.year, job.race, job.session, job.driver
        )?;
        let session = self
            .provider
            .load_session(&job.session_query())
            .await
            .with_context(|| format!("loading {} {} {}", job.year, job.race, job.session))?;
        writeln!(out, "Data loaded successfully.")?;

        writeln!(out, "Fetching laps for driver: {}...", job.driver)?;
        let laps = self
            .provider
            .pick_driver_laps(&session, &job.driver)
            .await
            .with_context(|| format!("fetching laps for {}", job.driver))?;
        if laps.is_empty() {
            writeln!(out, "No data found for driver {} in this session.\n", job.driver)?;
            return Ok(JobOutcome::NoData);
        }

        writeln!(out, "Extracting telemetry data...")?;
        let table = self
            .provider
            .telemetry(&session, &laps)
            .await
            .with_context(|| format!("extracting telemetry for {}", job.driver))?;
        writeln!(out, "Telemetry data extracted.")?;
        if table.is_empty() {
            writeln!(
                out,
                "No telemetry samples found for driver {} in this session.\n",
                job.driver
            )?;
            return Ok(JobOutcome::NoData);
        }

        let path = self
            .writer
            .write(&job, &table)
            .with_context(|| format!("writing {}", self.writer.path_for(&job).display()))?;
        writeln!(out, "Telemetry data saved to: {}\n", path.display())?;
        info!(path = %path.display(), rows = table.len(), "telemetry saved");
        Ok(JobOutcome::Saved(path))
    }
}

fn label_for(spec: &JobSpec) -> String {
    match JobConfig::from_spec(spec) {
        Ok(job) => format!("{} {} {} {}", job.year, job.race, job.session, job.driver),
        Err(_) => spec.to_string(),
    }
}
