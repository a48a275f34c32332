//! OpenF1 response records.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct MeetingRecord {
    pub meeting_key: u64,
    #[serde(default)]
    pub meeting_name: Option<String>,
    #[serde(default)]
    pub meeting_official_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub circuit_short_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub date_start: Option<DateTime<Utc>>,
}

impl MeetingRecord {
    pub fn display_name(&self) -> String {
        self.meeting_name
            .clone()
            .or_else(|| self.country_name.clone())
            .unwrap_or_else(|| format!("meeting {}", self.meeting_key))
    }

    pub fn is_testing(&self) -> bool {
        [&self.meeting_name, &self.meeting_official_name]
            .into_iter()
            .flatten()
            .any(|name| name.to_lowercase().contains("testing"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionRecord {
    pub session_key: u64,
    pub session_name: String,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub date_start: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverRecord {
    pub driver_number: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LapRecord {
    pub lap_number: u32,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lap_duration: Option<f64>,
}

/// One car channel sample (roughly 3.7 Hz).
#[derive(Debug, Clone, Deserialize)]
pub struct CarSample {
    #[serde(deserialize_with = "de_timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub rpm: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub n_gear: Option<f64>,
    #[serde(default)]
    pub throttle: Option<f64>,
    #[serde(default)]
    pub brake: Option<f64>,
    #[serde(default)]
    pub drs: Option<f64>,
}

/// One car position sample on the track map.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionSample {
    #[serde(deserialize_with = "de_timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
}

/// Parse an OpenF1 timestamp. Offsets are honoured; naive values are UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|n| Utc.from_utc_datetime(&n))
        })
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
    }
}
