//! Telemetry Provider Abstraction
//!
//! Interface to the external session-data service: locate a session, pick one
//! driver's laps from it, and extract that driver's combined telemetry. The
//! batch driver only talks to [`TelemetryProvider`]; [`OpenF1Client`] is the
//! networked implementation.

use crate::error::TelgetError;
use crate::table::TelemetryTable;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod cache;
pub mod merge;
pub mod openf1;
mod session;
pub mod wire;

pub use cache::HttpCache;
pub use openf1::OpenF1Client;
pub use session::{RaceRef, SessionKind, SessionQuery};

/// A loaded session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub session_key: u64,
    pub event_name: String,
    pub session_name: String,
    pub date_start: DateTime<Utc>,
}

/// One lap of a driver's session.
#[derive(Debug, Clone, PartialEq)]
pub struct Lap {
    pub lap_number: u32,
    pub date_start: Option<DateTime<Utc>>,
    /// Lap time in seconds.
    pub lap_duration: Option<f64>,
}

/// The laps driven by one driver in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverLaps {
    pub driver: String,
    /// None when the driver did not take part in the session.
    pub driver_number: Option<u32>,
    pub laps: Vec<Lap>,
}

impl DriverLaps {
    pub fn none(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            driver_number: None,
            laps: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }
}

/// Session-data provider trait
#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    /// Resolve and load one session of one event.
    async fn load_session(&self, query: &SessionQuery) -> Result<SessionInfo, TelgetError>;

    /// Laps for a driver abbreviation. An unknown driver yields no laps.
    async fn pick_driver_laps(
        &self,
        session: &SessionInfo,
        driver: &str,
    ) -> Result<DriverLaps, TelgetError>;

    /// Combined telemetry samples covering all of the given laps.
    async fn telemetry(
        &self,
        session: &SessionInfo,
        laps: &DriverLaps,
    ) -> Result<TelemetryTable, TelgetError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}
