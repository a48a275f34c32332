//! Error types for f1-telget.

use thiserror::Error;

/// Errors raised while resolving jobs, talking to the telemetry provider,
/// or writing output files.
#[derive(Debug, Error)]
pub enum TelgetError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid job configuration: {0}")]
    InvalidJob(String),

    #[error("Unknown session identifier: {0}")]
    UnknownSession(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Prompt failed: {0}")]
    PromptError(String),

    #[error("Malformed telemetry table: {0}")]
    TableShape(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<config::ConfigError> for TelgetError {
    fn from(err: config::ConfigError) -> Self {
        TelgetError::ConfigError(err.to_string())
    }
}
