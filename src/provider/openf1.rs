//! OpenF1 provider client.
//!
//! Talks to the public OpenF1 REST API. Every list request goes through the
//! on-disk [`HttpCache`] first, so repeated runs over the same session stay
//! offline.

use super::cache::HttpCache;
use super::merge;
use super::wire::{CarSample, DriverRecord, LapRecord, MeetingRecord, PositionSample, SessionRecord};
use super::{DriverLaps, Lap, RaceRef, SessionInfo, SessionKind, SessionQuery, TelemetryProvider};
use crate::config::ProviderSettings;
use crate::error::TelgetError;
use crate::table::TelemetryTable;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const DEFAULT_BASE_URL: &str = "https://api.openf1.org/v1";

fn map_http_error(error: reqwest::Error) -> TelgetError {
    if error.is_timeout() {
        TelgetError::ProviderRequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        TelgetError::ProviderRequestFailed(format!("Connection error: {}", error))
    } else {
        TelgetError::ProviderError(format!("HTTP error: {}", error))
    }
}

/// OpenF1 REST client
pub struct OpenF1Client {
    client: Client,
    base_url: String,
    cache: HttpCache,
}

impl OpenF1Client {
    pub fn new(settings: &ProviderSettings, cache: HttpCache) -> Result<Self, TelgetError> {
        let client = Client::builder()
            .user_agent(concat!("f1-telget/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| TelgetError::ProviderError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Full request URL for an endpoint; also the cache key.
    pub fn endpoint_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, TelgetError> {
        let base = format!("{}/{}", self.base_url, path);
        Url::parse_with_params(&base, query)
            .map_err(|e| TelgetError::ConfigError(format!("Invalid provider URL {}: {}", base, e)))
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, TelgetError> {
        let url = self.endpoint_url(path, query)?;
        if let Some(body) = self.cache.get(url.as_str()) {
            match parse_list(path, &body) {
                Ok(rows) => return Ok(rows),
                Err(e) => {
                    warn!(%url, error = %e, "discarding unreadable cache entry");
                    self.cache.remove(url.as_str());
                }
            }
        }

        debug!(%url, "requesting");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            // OpenF1 answers 404 when a filter matches nothing.
            debug!(%url, "no results");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => TelgetError::ProviderRateLimit(format!(
                    "Rate limit exceeded on /{}: {}",
                    path, error_text
                )),
                _ => TelgetError::ProviderRequestFailed(format!(
                    "/{} returned {}: {}",
                    path, status, error_text
                )),
            });
        }

        let body = response.text().await.map_err(map_http_error)?;
        let rows = parse_list(path, &body)?;
        if let Err(e) = self.cache.put(url.as_str(), &body) {
            warn!(error = %e, "failed to cache response");
        }
        Ok(rows)
    }
}

fn parse_list<T: DeserializeOwned>(path: &str, body: &str) -> Result<Vec<T>, TelgetError> {
    serde_json::from_str(body)
        .map_err(|e| TelgetError::ProviderError(format!("Failed to parse /{} response: {}", path, e)))
}

/// Case-, accent- and punctuation-insensitive form of an event name.
fn fold_name(s: &str) -> String {
    let folded: String = s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_event_suffix(name: &str) -> &str {
    name.strip_suffix(" grand prix")
        .or_else(|| name.strip_suffix(" gp"))
        .unwrap_or(name)
}

/// Pick the event a race reference points at.
pub fn select_meeting<'a>(meetings: &'a [MeetingRecord], race: &RaceRef) -> Option<&'a MeetingRecord> {
    match race {
        RaceRef::Round(round) => {
            let mut season: Vec<&MeetingRecord> =
                meetings.iter().filter(|m| !m.is_testing()).collect();
            season.sort_by_key(|m| m.date_start);
            season.get((*round as usize).checked_sub(1)?).copied()
        }
        RaceRef::Name(name) => {
            let folded = fold_name(name);
            let wanted = strip_event_suffix(&folded);
            if wanted.is_empty() {
                return None;
            }
            let wants_testing = wanted.contains("test");
            let candidates: Vec<(&MeetingRecord, Vec<String>)> = meetings
                .iter()
                .filter(|m| wants_testing || !m.is_testing())
                .map(|m| {
                    let fields = [
                        &m.meeting_name,
                        &m.country_name,
                        &m.location,
                        &m.circuit_short_name,
                        &m.meeting_official_name,
                    ]
                    .into_iter()
                    .flatten()
                    .map(|f| strip_event_suffix(&fold_name(f)).to_string())
                    .collect();
                    (m, fields)
                })
                .collect();

            candidates
                .iter()
                .find(|(_, fields)| fields.iter().any(|f| f == wanted))
                .or_else(|| {
                    candidates
                        .iter()
                        .find(|(_, fields)| fields.iter().any(|f| f.contains(wanted)))
                })
                .map(|(m, _)| *m)
        }
    }
}

/// Pick the session of an event a session kind points at.
pub fn select_session(sessions: &[SessionRecord], kind: SessionKind) -> Option<&SessionRecord> {
    match kind {
        SessionKind::Number(n) => {
            let mut ordered: Vec<&SessionRecord> = sessions.iter().collect();
            ordered.sort_by_key(|s| s.date_start);
            ordered.get(usize::from(n) - 1).copied()
        }
        _ => sessions.iter().find(|s| kind.matches_name(&s.session_name)),
    }
}

#[async_trait]
impl TelemetryProvider for OpenF1Client {
    async fn load_session(&self, query: &SessionQuery) -> Result<SessionInfo, TelgetError> {
        let meetings: Vec<MeetingRecord> = self
            .get_list("meetings", &[("year", query.year.to_string())])
            .await?;
        let meeting = select_meeting(&meetings, &query.race).ok_or_else(|| {
            TelgetError::EventNotFound(format!("no {} event matches '{}'", query.year, query.race))
        })?;
        let event_name = meeting.display_name();

        let sessions: Vec<SessionRecord> = self
            .get_list("sessions", &[("meeting_key", meeting.meeting_key.to_string())])
            .await?;
        let session = select_session(&sessions, query.session).ok_or_else(|| {
            TelgetError::SessionNotFound(format!("{} not found at {} {}", query.session, query.year, event_name))
        })?;
        let date_start = session.date_start.or(meeting.date_start).ok_or_else(|| {
            TelgetError::ProviderError(format!(
                "session {} has no start time",
                session.session_key
            ))
        })?;

        info!(
            session_key = session.session_key,
            event = %event_name,
            session = %session.session_name,
            "session resolved"
        );
        Ok(SessionInfo {
            session_key: session.session_key,
            event_name,
            session_name: session.session_name.clone(),
            date_start,
        })
    }

    async fn pick_driver_laps(
        &self,
        session: &SessionInfo,
        driver: &str,
    ) -> Result<DriverLaps, TelgetError> {
        let acronym = driver.trim().to_uppercase();
        let drivers: Vec<DriverRecord> = self
            .get_list(
                "drivers",
                &[
                    ("session_key", session.session_key.to_string()),
                    ("name_acronym", acronym.clone()),
                ],
            )
            .await?;
        let Some(record) = drivers.into_iter().next() else {
            info!(driver = %acronym, session_key = session.session_key, "driver not in session");
            return Ok(DriverLaps::none(driver));
        };

        let laps: Vec<LapRecord> = self
            .get_list(
                "laps",
                &[
                    ("session_key", session.session_key.to_string()),
                    ("driver_number", record.driver_number.to_string()),
                ],
            )
            .await?;
        debug!(driver = %acronym, laps = laps.len(), "laps fetched");

        Ok(DriverLaps {
            driver: driver.to_string(),
            driver_number: Some(record.driver_number),
            laps: laps
                .into_iter()
                .map(|l| Lap {
                    lap_number: l.lap_number,
                    date_start: l.date_start,
                    lap_duration: l.lap_duration,
                })
                .collect(),
        })
    }

    async fn telemetry(
        &self,
        session: &SessionInfo,
        laps: &DriverLaps,
    ) -> Result<TelemetryTable, TelgetError> {
        let Some(driver_number) = laps.driver_number else {
            return Ok(TelemetryTable::new(merge::COLUMNS));
        };
        let query = [
            ("session_key", session.session_key.to_string()),
            ("driver_number", driver_number.to_string()),
        ];
        let (car, positions) = futures::try_join!(
            self.get_list::<CarSample>("car_data", &query),
            self.get_list::<PositionSample>("location", &query),
        )?;
        debug!(
            car_samples = car.len(),
            position_samples = positions.len(),
            "samples fetched"
        );

        merge::combine(session.date_start, &laps.laps, car, positions)
    }

    fn provider_name(&self) -> &str {
        "openf1"
    }
}
