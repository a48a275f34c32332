//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::TelgetError;

/// Map run-level errors to a string for CLI output.
pub fn map_error(e: &TelgetError) -> String {
    match e {
        TelgetError::ConfigError(_) => format!(
            "{}\nCheck telget.toml, the file passed to --config, and TELGET__* variables.",
            e
        ),
        _ => e.to_string(),
    }
}
