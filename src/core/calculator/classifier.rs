//! Day classification of employees (task rule) and managers (time rule).
//!
//! The two rules stay separate: an ordinary employee's day is
//! judged on the checklist, a BDO's or market manager's on elapsed hours.

use crate::core::calculator::completion::TaskCompletion;
use crate::models::day_summary::{EmployeeStatus, ManagerStatus};
use crate::models::session::{ManagerSession, Session};
use crate::models::status::{DayStatus, ManagerDayStatus};
use chrono::{DateTime, Utc};

pub const UNKNOWN_NAME: &str = "Unknown";

/// Task rule: all done → completed, some done → half day, none → active.
pub fn classify_by_tasks(completed: usize, total: usize) -> DayStatus {
    if completed >= total {
        DayStatus::Completed
    } else if completed > 0 {
        DayStatus::HalfDay
    } else {
        DayStatus::Active
    }
}

/// Hour thresholds of the time rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourThresholds {
    pub full_day: f64,
    pub half_day: f64,
}

impl Default for HourThresholds {
    fn default() -> Self {
        Self {
            full_day: 8.0,
            half_day: 4.0,
        }
    }
}

pub fn elapsed_hours(
    punch_in: Option<DateTime<Utc>>,
    punch_out: Option<DateTime<Utc>>,
) -> Option<f64> {
    let (start, end) = (punch_in?, punch_out?);
    Some((end - start).num_milliseconds() as f64 / 3_600_000.0)
}

/// Time rule. Without both punches the session stays `Active` (pending).
pub fn classify_by_hours(
    punch_in: Option<DateTime<Utc>>,
    punch_out: Option<DateTime<Utc>>,
    thresholds: HourThresholds,
) -> ManagerDayStatus {
    match elapsed_hours(punch_in, punch_out) {
        None => ManagerDayStatus::Active,
        Some(h) if h >= thresholds.full_day => ManagerDayStatus::FullDay,
        Some(h) if h >= thresholds.half_day => ManagerDayStatus::HalfDay,
        Some(_) => ManagerDayStatus::Absent,
    }
}

/// Whole minutes between the punches, floored. `None` if either is missing.
pub fn duration_minutes(
    punch_in: Option<DateTime<Utc>>,
    punch_out: Option<DateTime<Utc>>,
) -> Option<i64> {
    let (start, end) = (punch_in?, punch_out?);
    Some((end - start).num_milliseconds().div_euclid(60_000))
}

/// Missing or blank names display as "Unknown".
pub fn display_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNKNOWN_NAME.to_string(),
    }
}

/// First letter of each word, upper-cased, at most two characters.
pub fn initials(name: &str) -> String {
    let out: String = name
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();

    if out.is_empty() {
        initials(UNKNOWN_NAME)
    } else {
        out
    }
}

/// Employee view of a session given its completed / total task counts.
pub fn classify(
    session: &Session,
    name: Option<&str>,
    completed: usize,
    total: usize,
) -> EmployeeStatus {
    let name = display_name(name);
    EmployeeStatus {
        id: session.user_id,
        session_id: session.id,
        initials: initials(&name),
        name,
        status: classify_by_tasks(completed, total),
        punch_in_time: session.punch_in_time,
        punch_out_time: session.punch_out_time,
        duration_minutes: duration_minutes(session.punch_in_time, session.punch_out_time),
        completed_tasks: completed,
        total_tasks: total,
    }
}

pub fn build_employee_status(
    session: &Session,
    name: Option<&str>,
    completion: &TaskCompletion,
) -> EmployeeStatus {
    classify(
        session,
        name,
        completion.completed_count(),
        completion.total(),
    )
}

pub fn build_manager_status(
    session: &ManagerSession,
    name: Option<&str>,
    thresholds: HourThresholds,
) -> ManagerStatus {
    let name = display_name(name);
    ManagerStatus {
        id: session.user_id,
        session_id: session.id,
        initials: initials(&name),
        name,
        role: session.role,
        status: classify_by_hours(session.punch_in_time, session.punch_out_time, thresholds),
        punch_in_time: session.punch_in_time,
        punch_out_time: session.punch_out_time,
        duration_minutes: duration_minutes(session.punch_in_time, session.punch_out_time),
        elapsed_hours: elapsed_hours(session.punch_in_time, session.punch_out_time),
    }
}
