//! Parsing for the time fields of the control window.

use std::time::Duration;

use chrono::format::ParseErrorKind;
use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("expected HH:MM:SS, got '{0}'")]
    MalformedDuration(String),
    #[error("expected HH:MM, got '{0}'")]
    MalformedClockTime(String),
    #[error("'{0}' is not a valid time of day")]
    InvalidTimeOfDay(String),
    #[error("duration '{0}' is too large")]
    Overflow(String),
}

/// Parses the preset field (`HH:MM:SS`). Each part is a plain non-negative
/// integer; minutes and seconds above 59 are simply added up.
pub fn parse_preset_duration(text: &str) -> Result<Duration, InputError> {
    let malformed = || InputError::MalformedDuration(text.to_string());
    let parts = split_numbers(text.trim(), 3).ok_or_else(malformed)?;

    let seconds = parts[0]
        .checked_mul(3600)
        .and_then(|h| parts[1].checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(parts[2]))
        .ok_or_else(|| InputError::Overflow(text.to_string()))?;

    Ok(Duration::from_secs(seconds))
}

/// Parses the clock field (`HH:MM`, optionally followed by ` h`).
pub fn parse_clock_time(text: &str) -> Result<NaiveTime, InputError> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('h').unwrap_or(trimmed).trim_end();
    NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|e| match e.kind() {
        ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => {
            InputError::InvalidTimeOfDay(text.to_string())
        }
        _ => InputError::MalformedClockTime(text.to_string()),
    })
}

/// The next local date-time at `time`: today, or tomorrow when today's
/// occurrence is already before `now`.
pub fn next_occurrence(time: NaiveTime, now: DateTime<Local>) -> Result<DateTime<Local>, InputError> {
    next_occurrence_in(&Local, time, now)
}

fn next_occurrence_in<Tz: TimeZone>(
    tz: &Tz,
    time: NaiveTime,
    now: DateTime<Tz>,
) -> Result<DateTime<Tz>, InputError> {
    let invalid = || InputError::InvalidTimeOfDay(time.format("%H:%M").to_string());

    let today = resolve_wall_clock(tz, now.date_naive().and_time(time)).ok_or_else(invalid)?;
    if today >= now {
        return Ok(today);
    }

    let tomorrow = now.date_naive().succ_opt().ok_or_else(invalid)?;
    resolve_wall_clock(tz, tomorrow.and_time(time)).ok_or_else(invalid)
}

/// Maps a wall-clock reading to an instant. Ambiguous readings take the
/// earlier instant; readings skipped by a forward shift move one hour on.
fn resolve_wall_clock<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&local).earliest().or_else(|| {
        let shifted = local.checked_add_signed(TimeDelta::hours(1))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}

fn split_numbers(text: &str, expected: usize) -> Option<Vec<u64>> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != expected {
        return None;
    }
    parts
        .into_iter()
        .map(|part| {
            let part = part.trim();
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse::<u64>().ok()
        })
        .collect()
}
