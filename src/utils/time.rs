//! Time utilities: parsing punch times, formatting instants and durations.

use crate::errors::{AppError, AppResult};
use crate::utils::date::ist;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Parse a punch instant.
///
/// Accepts RFC 3339 (`2025-06-01T09:00:00+05:30`) or a bare `HH:MM`, which
/// is read as IST wall-clock time on `date`.
pub fn parse_instant(input: &str, date: NaiveDate) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }

    let time = parse_time(input).ok_or_else(|| AppError::InvalidTime(input.to_string()))?;
    ist()
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidTime(input.to_string()))
}

/// Resolve an optional `--at` argument, defaulting to now.
pub fn parse_optional_instant(input: Option<&String>, date: NaiveDate) -> AppResult<DateTime<Utc>> {
    match input {
        Some(s) => parse_instant(s, date),
        None => Ok(Utc::now()),
    }
}

/// `HH:MM` in IST, or `--:--` when absent.
pub fn format_ist_time(instant: Option<DateTime<Utc>>) -> String {
    match instant {
        Some(dt) => dt.with_timezone(&ist()).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}

pub fn format_optional_minutes(mins: Option<i64>) -> String {
    mins.map(format_minutes).unwrap_or_else(|| "--:--".to_string())
}

/// Storage format for instants: RFC 3339 in UTC.
pub fn to_db_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn from_db_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
