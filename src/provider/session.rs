//! Session identifiers: which event and which session of it a job targets.

use crate::error::TelgetError;
use std::fmt;
use std::str::FromStr;

/// A session within an event, as named on the command line or in a batch file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Race,
    Qualifying,
    Sprint,
    /// Sprint Qualifying, called Sprint Shootout in 2023.
    SprintQualifying,
    Practice(u8),
    /// Position of the session in the event schedule (1-based).
    Number(u8),
}

impl SessionKind {
    /// Whether a provider session name denotes this kind.
    ///
    /// Always false for [`SessionKind::Number`], which is resolved by position.
    pub fn matches_name(&self, session_name: &str) -> bool {
        let name = normalize(session_name);
        match self {
            SessionKind::Race => name == "RACE",
            SessionKind::Qualifying => name == "QUALIFYING",
            SessionKind::Sprint => name == "SPRINT",
            SessionKind::SprintQualifying => {
                name == "SPRINT QUALIFYING" || name == "SPRINT SHOOTOUT"
            }
            SessionKind::Practice(n) => name == format!("PRACTICE {}", n),
            SessionKind::Number(_) => false,
        }
    }
}

impl FromStr for SessionKind {
    type Err = TelgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = normalize(s);
        let kind = match id.as_str() {
            "R" | "RACE" => SessionKind::Race,
            "Q" | "QUALIFYING" => SessionKind::Qualifying,
            "S" | "SPRINT" | "SPRINT RACE" => SessionKind::Sprint,
            "SQ" | "SS" | "SPRINT QUALIFYING" | "SPRINT SHOOTOUT" => {
                SessionKind::SprintQualifying
            }
            "FP1" | "PRACTICE 1" | "FREE PRACTICE 1" => SessionKind::Practice(1),
            "FP2" | "PRACTICE 2" | "FREE PRACTICE 2" => SessionKind::Practice(2),
            "FP3" | "PRACTICE 3" | "FREE PRACTICE 3" => SessionKind::Practice(3),
            _ => match id.parse::<u8>() {
                Ok(n @ 1..=5) => SessionKind::Number(n),
                _ => return Err(TelgetError::UnknownSession(s.to_string())),
            },
        };
        Ok(kind)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Race => f.write_str("Race"),
            SessionKind::Qualifying => f.write_str("Qualifying"),
            SessionKind::Sprint => f.write_str("Sprint"),
            SessionKind::SprintQualifying => f.write_str("Sprint Qualifying"),
            SessionKind::Practice(n) => write!(f, "Practice {}", n),
            SessionKind::Number(n) => write!(f, "Session {}", n),
        }
    }
}

/// Which event of a season a job targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceRef {
    Name(String),
    /// Championship round, counting non-testing events by start date.
    Round(u32),
}

impl RaceRef {
    pub fn parse(race: &str) -> Self {
        match race.trim().parse::<u32>() {
            Ok(round) if round > 0 => RaceRef::Round(round),
            _ => RaceRef::Name(race.trim().to_string()),
        }
    }
}

impl fmt::Display for RaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceRef::Name(name) => f.write_str(name),
            RaceRef::Round(round) => write!(f, "round {}", round),
        }
    }
}

/// Everything a provider needs to locate one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuery {
    pub year: i32,
    pub race: RaceRef,
    pub session: SessionKind,
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
