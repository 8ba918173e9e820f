use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::session::{ManagerRole, SessionStatus};
use super::status::{DayStatus, ManagerDayStatus, StatusSet};

/// Derived per-employee view of one session. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeStatus {
    pub id: i64,
    pub session_id: i64,
    pub name: String,
    pub initials: String,
    pub status: DayStatus,
    pub punch_in_time: Option<DateTime<Utc>>,
    pub punch_out_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}

/// Derived view of a BDO / market-manager session.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerStatus {
    pub id: i64,
    pub session_id: i64,
    pub name: String,
    pub initials: String,
    pub role: ManagerRole,
    pub status: ManagerDayStatus,
    pub punch_in_time: Option<DateTime<Utc>>,
    pub punch_out_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub elapsed_hours: Option<f64>,
}

/// One row of the admin "All Sessions" view.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOverview {
    pub session_id: i64,
    pub employee_name: String,
    pub market_name: String,
    pub session_date: NaiveDate,
    pub stored_status: SessionStatus,
    pub labels: StatusSet,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}
