//! Row mapping and batched reads/writes.
//!
//! Reads that feed a dashboard take a *set* of ids and bind it as an
//! `IN (...)` list: the number of statements depends on the number of
//! tables, never on the number of markets, sessions or employees.

use crate::db::db_utils::{conversion_error, id_chunks, placeholders};
use crate::errors::{AppError, AppResult};
use crate::models::session::{ManagerRole, ManagerSession, Session, SessionStatus};
use crate::models::task::{MediaType, TaskKind, TaskRow, TaskTable};
use crate::utils::date::format_date;
use crate::utils::time::{from_db_instant, to_db_instant};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, ToSql, params, params_from_iter};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Column parsing
// ---------------------------------------------------------------------------

fn get_date(row: &Row, col: &str) -> Result<NaiveDate> {
    let raw: String = row.get(col)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidDate(raw.clone())))
}

fn get_instant(row: &Row, col: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    from_db_instant(&raw).ok_or_else(|| conversion_error(0, AppError::InvalidTime(raw.clone())))
}

fn get_optional_instant(row: &Row, col: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        Some(s) if !s.is_empty() => from_db_instant(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(0, AppError::InvalidTime(s.clone()))),
        _ => Ok(None),
    }
}

pub fn map_session(row: &Row) -> Result<Session> {
    let status_str: String = row.get("status")?;
    let status = SessionStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(0, AppError::InvalidStatus(status_str.clone())))?;

    Ok(Session {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        market_id: row.get("market_id")?,
        session_date: get_date(row, "session_date")?,
        punch_in_time: get_optional_instant(row, "punch_in_time")?,
        punch_out_time: get_optional_instant(row, "punch_out_time")?,
        status,
    })
}

pub fn map_manager_session(row: &Row) -> Result<ManagerSession> {
    let role_str: String = row.get("role")?;
    let role = ManagerRole::from_db_str(&role_str)
        .ok_or_else(|| conversion_error(0, AppError::InvalidRole(role_str.clone())))?;

    Ok(ManagerSession {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        role,
        session_date: get_date(row, "session_date")?,
        punch_in_time: get_optional_instant(row, "punch_in_time")?,
        punch_out_time: get_optional_instant(row, "punch_out_time")?,
    })
}

fn task_columns(table: TaskTable) -> &'static str {
    match table {
        TaskTable::Media => {
            "id, session_id, market_id, user_id, date, created_at, media_type, captured_at"
        }
        TaskTable::StallConfirmations => {
            "id, session_id, market_id, user_id, date, created_at, stall_no"
        }
        _ => "id, session_id, market_id, user_id, date, created_at",
    }
}

/// Unknown media types map to `media_type: None`: the row still counts as
/// an upload, but toward no task kind.
pub fn map_task_row(table: TaskTable, row: &Row) -> Result<TaskRow> {
    let (media_type, captured_at) = if table == TaskTable::Media {
        let raw: String = row.get("media_type")?;
        (
            MediaType::from_db_str(&raw),
            get_optional_instant(row, "captured_at")?,
        )
    } else {
        (None, None)
    };

    let stall_no = if table == TaskTable::StallConfirmations {
        Some(row.get("stall_no")?)
    } else {
        None
    };

    Ok(TaskRow {
        table,
        id: row.get("id")?,
        session_id: row.get("session_id")?,
        market_id: row.get("market_id")?,
        user_id: row.get("user_id")?,
        date: get_date(row, "date")?,
        media_type,
        stall_no,
        created_at: get_instant(row, "created_at")?,
        captured_at,
    })
}

// ---------------------------------------------------------------------------
// Markets and employees
// ---------------------------------------------------------------------------

pub fn insert_market(conn: &Connection, name: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO markets (name, created_at) VALUES (?1, ?2)",
        params![name, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_employee(conn: &Connection, name: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO employees (name, created_at) VALUES (?1, ?2)",
        params![name, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

fn exists(conn: &Connection, table: &str, id: i64) -> AppResult<bool> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?1 LIMIT 1");
    let found = conn.query_row(&sql, [id], |_| Ok(())).optional()?;
    Ok(found.is_some())
}

pub fn ensure_employee(conn: &Connection, id: i64) -> AppResult<()> {
    if exists(conn, "employees", id)? {
        Ok(())
    } else {
        Err(AppError::UnknownId {
            entity: "employee",
            id,
        })
    }
}

pub fn ensure_market(conn: &Connection, id: i64) -> AppResult<()> {
    if exists(conn, "markets", id)? {
        Ok(())
    } else {
        Err(AppError::UnknownId {
            entity: "market",
            id,
        })
    }
}

/// All markets, ordered by id.
pub fn list_markets(conn: &Connection) -> AppResult<Vec<(i64, String)>> {
    let mut stmt = conn.prepare("SELECT id, name FROM markets ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn lookup_names(conn: &Connection, table: &str, ids: &[i64]) -> AppResult<HashMap<i64, String>> {
    let mut out = HashMap::new();

    for chunk in id_chunks(ids) {
        let sql = format!(
            "SELECT id, name FROM {table} WHERE id IN ({})",
            placeholders(chunk.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;
        for r in rows {
            let (id, name) = r?;
            out.insert(id, name);
        }
    }

    tracing::debug!(table, requested = ids.len(), found = out.len(), "batched name lookup");
    Ok(out)
}

/// Names of the given employees. Unknown ids are simply absent.
pub fn lookup_employee_names(conn: &Connection, ids: &[i64]) -> AppResult<HashMap<i64, String>> {
    lookup_names(conn, "employees", ids)
}

/// Names of the given markets. Unknown ids are simply absent.
pub fn lookup_market_names(conn: &Connection, ids: &[i64]) -> AppResult<HashMap<i64, String>> {
    lookup_names(conn, "markets", ids)
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub fn load_session(conn: &Connection, id: i64) -> AppResult<Option<Session>> {
    let mut stmt = conn.prepare("SELECT * FROM sessions WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_session).optional()?)
}

pub fn find_session(
    conn: &Connection,
    user_id: i64,
    market_id: i64,
    date: &NaiveDate,
) -> AppResult<Option<Session>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM sessions
         WHERE user_id = ?1 AND market_id = ?2 AND session_date = ?3",
    )?;
    Ok(stmt
        .query_row(params![user_id, market_id, format_date(date)], map_session)
        .optional()?)
}

pub fn insert_session(
    conn: &Connection,
    user_id: i64,
    market_id: i64,
    date: &NaiveDate,
    punch_in: &DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sessions (user_id, market_id, session_date, punch_in_time, status, created_at)
         VALUES (?1, ?2, ?3, ?4, 'active', ?5)",
        params![
            user_id,
            market_id,
            format_date(date),
            to_db_instant(punch_in),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_punch_in(conn: &Connection, id: i64, at: &DateTime<Utc>) -> AppResult<()> {
    conn.execute(
        "UPDATE sessions SET punch_in_time = ?1 WHERE id = ?2",
        params![to_db_instant(at), id],
    )?;
    Ok(())
}

pub fn set_punch_out(
    conn: &Connection,
    id: i64,
    at: &DateTime<Utc>,
    status: SessionStatus,
) -> AppResult<()> {
    conn.execute(
        "UPDATE sessions SET punch_out_time = ?1, status = ?2 WHERE id = ?3",
        params![to_db_instant(at), status.to_db_str(), id],
    )?;
    Ok(())
}

pub fn set_session_status(conn: &Connection, id: i64, status: SessionStatus) -> AppResult<()> {
    conn.execute(
        "UPDATE sessions SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    Ok(())
}

/// Sessions of the given markets on one business date.
pub fn load_sessions_for_markets(
    conn: &Connection,
    market_ids: &[i64],
    date: &NaiveDate,
) -> AppResult<Vec<Session>> {
    let date_str = format_date(date);
    let mut out = Vec::new();

    for chunk in id_chunks(market_ids) {
        let sql = format!(
            "SELECT * FROM sessions
             WHERE session_date = ? AND market_id IN ({})
             ORDER BY market_id ASC, id ASC",
            placeholders(chunk.len())
        );

        let mut params: Vec<&dyn ToSql> = vec![&date_str];
        params.extend(chunk.iter().map(|id| id as &dyn ToSql));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params), map_session)?;
        for r in rows {
            out.push(r?);
        }
    }

    tracing::debug!(markets = market_ids.len(), sessions = out.len(), "loaded sessions");
    Ok(out)
}

/// Sessions whose date lies in `[from, to]`, optionally for one market.
pub fn load_sessions_in_range(
    conn: &Connection,
    from: &NaiveDate,
    to: &NaiveDate,
    market_id: Option<i64>,
) -> AppResult<Vec<Session>> {
    let from_str = format_date(from);
    let to_str = format_date(to);

    let mut sql = String::from("SELECT * FROM sessions WHERE session_date >= ? AND session_date <= ?");
    let mut params: Vec<&dyn ToSql> = vec![&from_str, &to_str];
    if let Some(m) = market_id.as_ref() {
        sql.push_str(" AND market_id = ?");
        params.push(m);
    }
    sql.push_str(" ORDER BY session_date DESC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params), map_session)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Task rows
// ---------------------------------------------------------------------------

/// Rows of every task table for the given markets and date range.
///
/// One statement per table (per id chunk).
pub fn load_task_rows_for_markets(
    conn: &Connection,
    market_ids: &[i64],
    from: &NaiveDate,
    to: &NaiveDate,
) -> AppResult<Vec<TaskRow>> {
    let from_str = format_date(from);
    let to_str = format_date(to);
    let chunks = id_chunks(market_ids);
    let mut out = Vec::new();

    for table in TaskTable::ALL {
        for chunk in &chunks {
            let sql = format!(
                "SELECT {} FROM {} WHERE date >= ? AND date <= ? AND market_id IN ({})",
                task_columns(table),
                table.table_name(),
                placeholders(chunk.len())
            );

            let mut params: Vec<&dyn ToSql> = vec![&from_str, &to_str];
            params.extend(chunk.iter().map(|id| id as &dyn ToSql));

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(params), |row| map_task_row(table, row))?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    tracing::debug!(markets = market_ids.len(), rows = out.len(), "loaded task rows");
    Ok(out)
}

/// A task row to be written.
#[derive(Debug, Clone)]
pub struct NewTaskRow {
    pub kind: TaskKind,
    pub session_id: Option<i64>,
    pub market_id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub stall_no: Option<i64>,
    pub details: String,
    pub at: DateTime<Utc>,
}

/// Insert one task row into the table of its kind; returns the new id.
pub fn insert_task_row(conn: &Connection, row: &NewTaskRow) -> AppResult<i64> {
    let table = row.kind.table();
    let date = format_date(&row.date);
    let at = to_db_instant(&row.at);

    match table {
        TaskTable::Media => {
            let media_type = row
                .kind
                .media_type()
                .ok_or_else(|| AppError::InvalidMediaType(row.kind.to_string()))?;
            conn.execute(
                "INSERT INTO media (session_id, market_id, user_id, date, media_type, details, captured_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    row.session_id,
                    row.market_id,
                    row.user_id,
                    date,
                    media_type.to_db_str(),
                    row.details,
                    at,
                ],
            )?;
        }
        TaskTable::StallConfirmations => {
            let stall_no = row
                .stall_no
                .ok_or_else(|| AppError::Validation("stall confirmation needs a stall number".into()))?;
            conn.execute(
                "INSERT INTO stall_confirmations (session_id, market_id, user_id, date, stall_no, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row.session_id,
                    row.market_id,
                    row.user_id,
                    date,
                    stall_no,
                    row.details,
                    at,
                ],
            )?;
        }
        _ => {
            let sql = format!(
                "INSERT INTO {} (session_id, market_id, user_id, date, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                table.table_name()
            );
            conn.execute(
                &sql,
                params![
                    row.session_id,
                    row.market_id,
                    row.user_id,
                    date,
                    row.details,
                    at,
                ],
            )?;
        }
    }

    Ok(conn.last_insert_rowid())
}

/// Compensating delete of a row written earlier in a failed sequence.
pub fn delete_task_row(conn: &Connection, table: TaskTable, id: i64) -> AppResult<usize> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", table.table_name());
    Ok(conn.execute(&sql, [id])?)
}

pub fn count_rows(conn: &Connection, table: TaskTable) -> AppResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.table_name());
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

// ---------------------------------------------------------------------------
// Manager (BDO / market manager) sessions
// ---------------------------------------------------------------------------

pub fn find_manager_session(
    conn: &Connection,
    user_id: i64,
    date: &NaiveDate,
) -> AppResult<Option<ManagerSession>> {
    let mut stmt =
        conn.prepare("SELECT * FROM bdo_sessions WHERE user_id = ?1 AND session_date = ?2")?;
    Ok(stmt
        .query_row(params![user_id, format_date(date)], map_manager_session)
        .optional()?)
}

pub fn insert_manager_session(
    conn: &Connection,
    user_id: i64,
    role: ManagerRole,
    date: &NaiveDate,
    punch_in: &DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO bdo_sessions (user_id, role, session_date, punch_in_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            role.to_db_str(),
            format_date(date),
            to_db_instant(punch_in),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_manager_punch_out(conn: &Connection, id: i64, at: &DateTime<Utc>) -> AppResult<()> {
    conn.execute(
        "UPDATE bdo_sessions SET punch_out_time = ?1 WHERE id = ?2",
        params![to_db_instant(at), id],
    )?;
    Ok(())
}

pub fn load_manager_sessions(conn: &Connection, date: &NaiveDate) -> AppResult<Vec<ManagerSession>> {
    let mut stmt =
        conn.prepare("SELECT * FROM bdo_sessions WHERE session_date = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map([format_date(date)], map_manager_session)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

pub fn load_log(conn: &Connection) -> Result<Vec<(i64, String, String, String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, operation, IFNULL(target, ''), message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }

    Ok(out)
}
