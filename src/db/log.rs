use crate::errors::AppResult;
use chrono::Utc;
use rusqlite::Connection;
use rusqlite::params;

/// Append an audit line to the `log` table.
pub fn audit(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;
    tracing::debug!(operation, target, message, "audit");

    Ok(())
}

/// Audit without failing the caller: the write it describes already happened.
pub fn audit_quietly(conn: &Connection, operation: &str, target: &str, message: &str) {
    if let Err(e) = audit(conn, operation, target, message) {
        tracing::warn!(error = %e, operation, "failed to write audit log");
    }
}
