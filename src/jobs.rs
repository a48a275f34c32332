//! Job resolution: turn command-line input into the list of jobs to run.
//!
//! Exactly one source is used, in priority order: a JSON batch file, a
//! complete set of job flags, or interactive prompts.

use crate::error::TelgetError;
use crate::job::JobSpec;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

mod prompt;

pub use prompt::{LinePrompter, Prompter, TerminalPrompter};

/// Job-related command-line values.
#[derive(Debug, Clone, Default)]
pub struct JobArgs {
    pub json: Option<PathBuf>,
    pub year: Option<i32>,
    pub race: Option<String>,
    pub session: Option<String>,
    pub driver: Option<String>,
}

/// Where jobs come from.
#[derive(Debug, Clone, PartialEq)]
pub enum JobSource {
    BatchFile(PathBuf),
    Flags(JobSpec),
    Interactive,
}

impl JobSource {
    /// A batch file wins over flags; flags count only when all four are given.
    pub fn select(args: &JobArgs) -> Self {
        if let Some(path) = &args.json {
            return JobSource::BatchFile(path.clone());
        }
        match (&args.year, &args.race, &args.session, &args.driver) {
            (Some(year), Some(race), Some(session), Some(driver)) => {
                JobSource::Flags(JobSpec::from_fields(*year, race.clone(), session.clone(), driver.clone()))
            }
            _ => JobSource::Interactive,
        }
    }
}

/// Resolve the job list, printing what happens to `out`.
///
/// Unreadable or undecodable batch files and cancelled prompts yield an empty
/// list rather than an error, so the caller reports "nothing to process".
pub fn resolve_jobs<W: Write>(
    source: &JobSource,
    prompter: &mut dyn Prompter,
    out: &mut W,
) -> Result<Vec<JobSpec>, TelgetError> {
    match source {
        JobSource::BatchFile(path) => {
            writeln!(out, "Loading configurations from JSON file: {}", path.display())?;
            load_batch_file(path, out)
        }
        JobSource::Flags(spec) => {
            writeln!(out, "Using configuration from command-line arguments.")?;
            Ok(vec![spec.clone()])
        }
        JobSource::Interactive => prompt_for_job(prompter, out),
    }
}

fn load_batch_file<W: Write>(path: &Path, out: &mut W) -> Result<Vec<JobSpec>, TelgetError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!(path = %path.display(), "batch file not found");
            writeln!(out, "Error: JSON file not found at '{}'", path.display())?;
            return Ok(Vec::new());
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "batch file unreadable");
            writeln!(out, "Error: Could not read JSON file '{}': {}", path.display(), e)?;
            return Ok(Vec::new());
        }
    };

    match parse_batch(&text) {
        Some(jobs) => {
            info!(path = %path.display(), jobs = jobs.len(), "batch file loaded");
            Ok(jobs)
        }
        None => {
            error!(path = %path.display(), "batch file is not a JSON list of jobs");
            writeln!(
                out,
                "Error: Could not decode JSON from '{}'. Please check its format.",
                path.display()
            )?;
            Ok(Vec::new())
        }
    }
}

/// Jobs in a batch document: one per element of a top-level array, or a
/// single job for a top-level object.
pub fn parse_batch(text: &str) -> Option<Vec<JobSpec>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(items.into_iter().map(JobSpec::new).collect()),
        object @ Value::Object(_) => Some(vec![JobSpec::new(object)]),
        _ => None,
    }
}

fn prompt_for_job<W: Write>(
    prompter: &mut dyn Prompter,
    out: &mut W,
) -> Result<Vec<JobSpec>, TelgetError> {
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "No configuration file or arguments provided. Entering interactive mode.")?;
    writeln!(out, "Please provide the details for the data you want to fetch.")?;
    out.flush()?;

    let questions = [
        "Enter the year (e.g., 2023)",
        "Enter the race name (e.g., 'Bahrain')",
        "Enter the session (R, Q, FP1, etc.)",
        "Enter the 3-letter driver code (e.g., 'VER')",
    ];
    let mut answers = Vec::with_capacity(questions.len());
    for question in questions {
        match prompter.ask(question)? {
            Some(answer) => answers.push(answer),
            None => {
                writeln!(out)?;
                writeln!(out, "Interactive input cancelled by user.")?;
                return Ok(Vec::new());
            }
        }
    }

    let [year, race, session, driver]: [String; 4] = answers
        .try_into()
        .map_err(|_| TelgetError::PromptError("incomplete answers".to_string()))?;
    Ok(vec![JobSpec::from_fields(
        year,
        race,
        session.to_uppercase(),
        driver.to_uppercase(),
    )])
}
