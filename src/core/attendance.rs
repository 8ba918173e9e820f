use crate::core::calculator::classifier::{HourThresholds, build_employee_status, build_manager_status};
use crate::core::calculator::completion::{TaskIndex, evaluate};
use crate::core::logic::Core;
use crate::db::pool::DbPool;
use crate::db::queries::{ensure_market, load_manager_sessions, lookup_employee_names};
use crate::errors::AppResult;
use crate::models::day_summary::{EmployeeStatus, ManagerStatus};
use crate::models::task::Checklist;
use chrono::NaiveDate;

/// Attendance dashboards: employees of a market, and managers.
pub struct AttendanceLogic;

impl AttendanceLogic {
    /// Task-rule status of every employee with a session at `market_id` on `date`.
    pub fn employee_statuses(
        pool: &mut DbPool,
        market_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<EmployeeStatus>> {
        ensure_market(&pool.conn, market_id)?;

        let batch = Core::load_day(&pool.conn, &[market_id], &date)?;
        let index = TaskIndex::from_rows(&batch.rows);

        Ok(batch
            .sessions
            .iter()
            .map(|s| {
                let completion = evaluate(s, &index, &Checklist::EMPLOYEE_DAY);
                build_employee_status(s, batch.employee_name(s.user_id), &completion)
            })
            .collect())
    }

    /// Time-rule status of every BDO / market-manager session on `date`.
    pub fn manager_statuses(
        pool: &mut DbPool,
        date: NaiveDate,
        thresholds: HourThresholds,
    ) -> AppResult<Vec<ManagerStatus>> {
        let sessions = load_manager_sessions(&pool.conn, &date)?;
        let user_ids: Vec<i64> = sessions.iter().map(|s| s.user_id).collect();
        let names = lookup_employee_names(&pool.conn, &user_ids)?;

        Ok(sessions
            .iter()
            .map(|s| build_manager_status(s, names.get(&s.user_id).map(String::as_str), thresholds))
            .collect())
    }
}
