use crate::db::queries::{load_sessions_for_markets, load_task_rows_for_markets, lookup_employee_names};
use crate::errors::AppResult;
use crate::models::session::Session;
use crate::models::task::TaskRow;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashMap;

/// Everything a dashboard needs for one business date, loaded in batch.
#[derive(Debug, Default)]
pub struct DayBatch {
    pub sessions: Vec<Session>,
    pub rows: Vec<TaskRow>,
    pub employee_names: HashMap<i64, String>,
}

impl DayBatch {
    pub fn employee_name(&self, id: i64) -> Option<&str> {
        self.employee_names.get(&id).map(String::as_str)
    }
}

pub struct Core;

impl Core {
    /// Sessions, task rows and employee names of `market_ids` on `date`.
    ///
    /// Fixed number of statements: one for sessions, one per task table,
    /// one for names.
    pub fn load_day(conn: &Connection, market_ids: &[i64], date: &NaiveDate) -> AppResult<DayBatch> {
        if market_ids.is_empty() {
            return Ok(DayBatch::default());
        }

        let sessions = load_sessions_for_markets(conn, market_ids, date)?;
        let rows = load_task_rows_for_markets(conn, market_ids, date, date)?;

        let user_ids: Vec<i64> = sessions.iter().map(|s| s.user_id).collect();
        let employee_names = lookup_employee_names(conn, &user_ids)?;

        Ok(DayBatch {
            sessions,
            rows,
            employee_names,
        })
    }
}
