//! Job descriptors: the raw form a job arrives in and the validated form
//! the batch driver works with.

use crate::error::TelgetError;
use crate::provider::{RaceRef, SessionKind, SessionQuery};
use serde_json::{Map, Value};
use std::fmt;

/// A job descriptor exactly as supplied by a batch file, flags or prompts.
///
/// Kept unvalidated so that one malformed entry fails only its own job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec(Value);

impl JobSpec {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Build a descriptor from discrete values (flags or prompt answers).
    pub fn from_fields(
        year: impl Into<Value>,
        race: impl Into<String>,
        session: impl Into<String>,
        driver: impl Into<String>,
    ) -> Self {
        let mut map = Map::new();
        map.insert("year".to_string(), year.into());
        map.insert("race".to_string(), Value::String(race.into()));
        map.insert("session".to_string(), Value::String(session.into()));
        map.insert("driver".to_string(), Value::String(driver.into()));
        Self(Value::Object(map))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for JobSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated job: one session, one driver.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    pub year: i32,
    pub race: String,
    /// Session identifier as supplied; used verbatim in the output filename.
    pub session: String,
    pub session_kind: SessionKind,
    pub driver: String,
}

impl JobConfig {
    pub fn from_spec(spec: &JobSpec) -> Result<Self, TelgetError> {
        let map = spec.as_value().as_object().ok_or_else(|| {
            TelgetError::InvalidJob("expected an object with year, race, session and driver".to_string())
        })?;

        let year = parse_year(map.get("year"))?;
        let race = required_str(map, "race")?;
        let session = required_str(map, "session")?;
        let driver = required_str(map, "driver")?;
        let session_kind = session.parse::<SessionKind>()?;

        Ok(Self {
            year,
            race,
            session,
            session_kind,
            driver,
        })
    }

    /// `{year}-{race}-{session}-{driver}-telemetry.csv`, with spaces in the
    /// race name turned into dashes and every part lower-cased.
    pub fn output_filename(&self) -> String {
        format!(
            "{}-{}-{}-{}-telemetry.csv",
            self.year,
            self.race.replace(' ', "-").to_lowercase(),
            self.session.to_lowercase(),
            self.driver.to_lowercase()
        )
    }

    pub fn session_query(&self) -> SessionQuery {
        SessionQuery {
            year: self.year,
            race: RaceRef::parse(&self.race),
            session: self.session_kind,
        }
    }
}

fn parse_year(value: Option<&Value>) -> Result<i32, TelgetError> {
    let invalid = |v: &Value| TelgetError::InvalidJob(format!("invalid year: {}", v));
    match value {
        None | Some(Value::Null) => Err(TelgetError::InvalidJob("missing field 'year'".to_string())),
        Some(v @ Value::Number(n)) => {
            let whole = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .ok_or_else(|| invalid(v))?;
            i32::try_from(whole).map_err(|_| invalid(v))
        }
        Some(v @ Value::String(s)) => s.trim().parse::<i32>().map_err(|_| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}

fn required_str(map: &Map<String, Value>, key: &str) -> Result<String, TelgetError> {
    match map.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(TelgetError::InvalidJob(format!("field '{}' is empty", key))),
        Some(Value::Null) | None => Err(TelgetError::InvalidJob(format!("missing field '{}'", key))),
        Some(other) => Err(TelgetError::InvalidJob(format!(
            "field '{}' must be a string, got {}",
            key, other
        ))),
    }
}
