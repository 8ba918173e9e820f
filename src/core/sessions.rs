use crate::core::calculator::classifier::display_name;
use crate::core::calculator::completion::{TaskIndex, evaluate};
use crate::core::calculator::resolver::resolve_statuses;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::queries::{
    load_session, load_sessions_in_range, load_task_rows_for_markets, lookup_employee_names,
    lookup_market_names, set_session_status,
};
use crate::errors::{AppError, AppResult};
use crate::models::day_summary::SessionOverview;
use crate::models::session::{Session, SessionStatus};
use crate::models::task::Checklist;
use chrono::NaiveDate;

/// Admin operations over sessions.
pub struct SessionLogic;

impl SessionLogic {
    /// Freeze a session as `finalized` (or `locked`). Frozen sessions accept
    /// no further punches or task rows.
    pub fn finalize(pool: &mut DbPool, session_id: i64, lock: bool) -> AppResult<Session> {
        let session =
            load_session(&pool.conn, session_id)?.ok_or(AppError::SessionNotFound(session_id))?;

        if session.status.is_frozen() {
            return Err(AppError::SessionImmutable {
                id: session.id,
                status: session.status.to_string(),
            });
        }

        let status = if lock {
            SessionStatus::Locked
        } else {
            SessionStatus::Finalized
        };
        set_session_status(&pool.conn, session_id, status)?;

        audit_quietly(
            &pool.conn,
            "finalize",
            &format!("session {session_id}"),
            &format!("session marked {status}"),
        );

        load_session(&pool.conn, session_id)?.ok_or(AppError::SessionNotFound(session_id))
    }

    /// "All Sessions" view: every session in `[from, to]` with its label set.
    ///
    /// `today` is injected so the view is reproducible; callers pass
    /// `business_today()`.
    pub fn overview(
        pool: &mut DbPool,
        from: NaiveDate,
        to: NaiveDate,
        market_id: Option<i64>,
        today: NaiveDate,
    ) -> AppResult<Vec<SessionOverview>> {
        if from > to {
            return Err(AppError::Validation(format!(
                "empty range: {from} is after {to}"
            )));
        }

        let sessions = load_sessions_in_range(&pool.conn, &from, &to, market_id)?;
        if sessions.is_empty() {
            return Ok(Vec::new());
        }

        let market_ids: Vec<i64> = sessions.iter().map(|s| s.market_id).collect();
        let user_ids: Vec<i64> = sessions.iter().map(|s| s.user_id).collect();

        let rows = load_task_rows_for_markets(&pool.conn, &market_ids, &from, &to)?;
        let employee_names = lookup_employee_names(&pool.conn, &user_ids)?;
        let market_names = lookup_market_names(&pool.conn, &market_ids)?;

        let index = TaskIndex::from_rows(&rows);
        let checklist = Checklist::SESSION_REVIEW;

        Ok(sessions
            .iter()
            .map(|s| {
                let completion = evaluate(s, &index, &checklist);
                SessionOverview {
                    session_id: s.id,
                    employee_name: display_name(employee_names.get(&s.user_id).map(String::as_str)),
                    market_name: display_name(market_names.get(&s.market_id).map(String::as_str)),
                    session_date: s.session_date,
                    stored_status: s.status,
                    labels: resolve_statuses(s, &completion, today),
                    completed_tasks: completion.completed_count(),
                    total_tasks: checklist.total(),
                }
            })
            .collect())
    }
}
