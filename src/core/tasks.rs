use crate::core::write_sequence::{PartialWrite, WriteSequence, WrittenRow};
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::queries::{NewTaskRow, insert_task_row, load_session};
use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use crate::models::task::TaskKind;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Recording checklist tasks against a session.
pub struct TaskLogic;

/// A session that still accepts task rows.
fn writable_session(pool: &DbPool, session_id: i64) -> AppResult<Session> {
    let session = load_session(&pool.conn, session_id)?.ok_or(AppError::SessionNotFound(session_id))?;
    if session.status.is_frozen() {
        return Err(AppError::SessionImmutable {
            id: session.id,
            status: session.status.to_string(),
        });
    }
    Ok(session)
}

fn row_for(
    session: &Session,
    kind: TaskKind,
    stall_no: Option<i64>,
    details: &str,
    at: DateTime<Utc>,
) -> NewTaskRow {
    NewTaskRow {
        kind,
        session_id: Some(session.id),
        market_id: session.market_id,
        user_id: session.user_id,
        date: session.session_date,
        stall_no,
        details: details.to_string(),
        at,
    }
}

impl TaskLogic {
    /// Record one task row. Market-scoped columns come from the session.
    pub fn record(
        pool: &mut DbPool,
        session_id: i64,
        kind: TaskKind,
        stall_no: Option<i64>,
        details: &str,
        at: DateTime<Utc>,
    ) -> AppResult<i64> {
        if kind == TaskKind::StallConfirmations && stall_no.is_none() {
            return Err(AppError::Validation(
                "stall_confirmations needs --stall <N>".into(),
            ));
        }
        if let Some(n) = stall_no
            && n <= 0
        {
            return Err(AppError::Validation(format!("invalid stall number: {n}")));
        }

        let session = writable_session(pool, session_id)?;
        let id = insert_task_row(&pool.conn, &row_for(&session, kind, stall_no, details, at))?;

        audit_quietly(
            &pool.conn,
            "task",
            &format!("{kind} {id}"),
            &format!("recorded {kind} for session {session_id}"),
        );

        Ok(id)
    }

    /// Next-day planning followed by one stall confirmation per stall.
    ///
    /// Validation happens before the first write. A failure after that is
    /// returned as [`PartialWrite`]; nothing is undone automatically.
    pub fn submit_planning(
        pool: &mut DbPool,
        session_id: i64,
        stalls: &[i64],
        notes: &str,
        at: DateTime<Utc>,
    ) -> Result<Vec<WrittenRow>, PartialWrite> {
        let validated = Self::validate_planning(pool, session_id, stalls);
        let mut seq = WriteSequence::new(&pool.conn);

        let session = match validated {
            Ok(s) => s,
            Err(e) => return Err(seq.interrupt(e)),
        };

        seq.insert(&row_for(&session, TaskKind::NextDayPlanning, None, notes, at))?;
        for stall in stalls {
            seq.insert(&row_for(
                &session,
                TaskKind::StallConfirmations,
                Some(*stall),
                "",
                at,
            ))?;
        }

        let written = seq.finish();
        audit_quietly(
            &pool.conn,
            "planning",
            &format!("session {session_id}"),
            &format!("planning with {} stall confirmation(s)", stalls.len()),
        );
        Ok(written)
    }

    fn validate_planning(pool: &DbPool, session_id: i64, stalls: &[i64]) -> AppResult<Session> {
        if stalls.is_empty() {
            return Err(AppError::Validation("planning needs at least one stall".into()));
        }
        if let Some(bad) = stalls.iter().find(|n| **n <= 0) {
            return Err(AppError::Validation(format!("invalid stall number: {bad}")));
        }
        let dups = duplicate_stalls(stalls);
        if !dups.is_empty() {
            return Err(AppError::Validation(format!("stall(s) listed twice: {dups:?}")));
        }
        writable_session(pool, session_id)
    }
}

/// Stall numbers repeated in `stalls`, in first-seen order.
fn duplicate_stalls(stalls: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for s in stalls {
        if !seen.insert(*s) && !dups.contains(s) {
            dups.push(*s);
        }
    }
    dups
}
