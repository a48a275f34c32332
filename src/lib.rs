//! Telget: F1 telemetry fetcher
//!
//! Resolves telemetry jobs (year, race, session, driver), fetches the
//! driver's laps and car telemetry from a provider and saves each job as a
//! CSV file. Jobs fail independently; a batch always runs to the end.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod job;
pub mod jobs;
pub mod logging;
pub mod provider;
pub mod table;
