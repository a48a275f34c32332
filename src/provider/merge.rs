//! Combine car channels and track position into one per-lap telemetry table.
//!
//! Car samples form the timeline. Each one is tagged with the lap whose window
//! contains it; samples outside every lap window are dropped. Position is
//! linearly interpolated onto the car sample timestamps.

use super::wire::{CarSample, PositionSample};
use super::Lap;
use crate::error::TelgetError;
use crate::table::{Cell, TelemetryTable};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

pub const COLUMNS: [&str; 15] = [
    "Date",
    "SessionTime",
    "LapNumber",
    "Time",
    "RPM",
    "Speed",
    "nGear",
    "Throttle",
    "Brake",
    "DRS",
    "X",
    "Y",
    "Z",
    "Distance",
    "RelativeDistance",
];

/// Gap between two lap windows still treated as continuous driving.
const CONTIGUOUS_GAP_MS: i64 = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct LapWindow {
    pub lap_number: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Time windows of the given laps, ordered by start.
///
/// A lap without a duration ends where the next timed lap starts; a lap
/// without a start time has no window.
pub fn lap_windows(laps: &[Lap]) -> Vec<LapWindow> {
    let mut ordered: Vec<&Lap> = laps.iter().collect();
    ordered.sort_by_key(|lap| lap.lap_number);

    let mut windows = Vec::with_capacity(ordered.len());
    for (i, lap) in ordered.iter().enumerate() {
        let Some(start) = lap.date_start else {
            continue;
        };
        let end = match lap.lap_duration {
            Some(secs) if secs > 0.0 => {
                let end = Duration::try_milliseconds((secs * 1000.0).round() as i64)
                    .and_then(|length| start.checked_add_signed(length));
                match end {
                    Some(end) => end,
                    None => continue,
                }
            }
            _ => match ordered[i + 1..].iter().find_map(|next| next.date_start) {
                Some(next_start) if next_start > start => next_start,
                _ => continue,
            },
        };
        windows.push(LapWindow {
            lap_number: lap.lap_number,
            start,
            end,
        });
    }
    windows.sort_by_key(|w| w.start);
    windows
}

fn find_window(windows: &[LapWindow], t: DateTime<Utc>) -> Option<usize> {
    let idx = windows.partition_point(|w| w.start <= t);
    let candidate = idx.checked_sub(1)?;
    (t < windows[candidate].end).then_some(candidate)
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn lerp(a: Option<f64>, b: Option<f64>, frac: f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * frac),
        (a, b) => a.or(b),
    }
}

/// Position at `t`, interpolated between the surrounding samples.
/// `positions` must be ordered by date.
fn interpolate_position(
    positions: &[PositionSample],
    t: DateTime<Utc>,
) -> (Option<f64>, Option<f64>, Option<f64>) {
    let idx = positions.partition_point(|p| p.date <= t);
    let before = idx.checked_sub(1).map(|i| &positions[i]);
    let after = positions.get(idx);
    match (before, after) {
        (Some(a), Some(b)) => {
            let span = seconds_between(a.date, b.date);
            let frac = if span > 0.0 {
                seconds_between(a.date, t) / span
            } else {
                0.0
            };
            (lerp(a.x, b.x, frac), lerp(a.y, b.y, frac), lerp(a.z, b.z, frac))
        }
        (Some(p), None) | (None, Some(p)) => (p.x, p.y, p.z),
        (None, None) => (None, None, None),
    }
}

struct Kept<'a> {
    sample: &'a CarSample,
    window: usize,
    distance: f64,
}

/// Build the combined telemetry table for a driver's laps.
pub fn combine(
    session_start: DateTime<Utc>,
    laps: &[Lap],
    mut car: Vec<CarSample>,
    mut positions: Vec<PositionSample>,
) -> Result<TelemetryTable, TelgetError> {
    let windows = lap_windows(laps);
    car.sort_by_key(|s| s.date);
    positions.sort_by_key(|p| p.date);

    let mut kept: Vec<Kept<'_>> = Vec::new();
    let mut distance = 0.0;
    for sample in &car {
        let Some(window) = find_window(&windows, sample.date) else {
            continue;
        };
        if let Some(prev) = kept.last() {
            if is_continuous(&windows, prev.window, window) {
                if let (Some(v0), Some(v1)) = (prev.sample.speed, sample.speed) {
                    let dt = seconds_between(prev.sample.date, sample.date);
                    distance += (v0 + v1) / 2.0 / 3.6 * dt;
                }
            }
        }
        kept.push(Kept {
            sample,
            window,
            distance,
        });
    }

    let total = distance;
    let mut table = TelemetryTable::new(COLUMNS);
    for row in &kept {
        let s = row.sample;
        let window = &windows[row.window];
        let (x, y, z) = interpolate_position(&positions, s.date);
        let relative = if total > 0.0 {
            Cell::Float(round_to(row.distance / total, 6))
        } else {
            Cell::Empty
        };
        table.push_row(vec![
            Cell::Text(s.date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Cell::Float(round_to(seconds_between(session_start, s.date), 3)),
            Cell::Int(i64::from(window.lap_number)),
            Cell::Float(round_to(seconds_between(window.start, s.date), 3)),
            Cell::from(s.rpm),
            Cell::from(s.speed),
            Cell::from(s.n_gear),
            Cell::from(s.throttle),
            s.brake.map(|b| Cell::Bool(b > 0.0)).unwrap_or(Cell::Empty),
            Cell::from(s.drs),
            Cell::from(x.map(|v| round_to(v, 3))),
            Cell::from(y.map(|v| round_to(v, 3))),
            Cell::from(z.map(|v| round_to(v, 3))),
            Cell::Float(round_to(row.distance, 3)),
            relative,
        ])?;
    }
    Ok(table)
}

fn is_continuous(windows: &[LapWindow], prev: usize, current: usize) -> bool {
    if prev == current {
        return true;
    }
    if current != prev + 1 {
        return false;
    }
    (windows[current].start - windows[prev].end).num_milliseconds().abs() <= CONTIGUOUS_GAP_MS
}
