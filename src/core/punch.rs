use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::queries::{
    ensure_employee, ensure_market, find_manager_session, find_session, insert_manager_session,
    insert_session, load_session, set_manager_punch_out, set_punch_in, set_punch_out,
};
use crate::errors::{AppError, AppResult};
use crate::models::session::{ManagerRole, ManagerSession, Session, SessionStatus};
use crate::utils::date::{business_date_for, format_date};
use chrono::{DateTime, NaiveDate, Utc};

/// Session lifecycle: punch-in creates the session, punch-out closes it.
pub struct PunchLogic;

fn frozen_guard(session: &Session) -> AppResult<()> {
    if session.status.is_frozen() {
        tracing::warn!(session = session.id, status = %session.status, "write on frozen session rejected");
        return Err(AppError::SessionImmutable {
            id: session.id,
            status: session.status.to_string(),
        });
    }
    Ok(())
}

/// An explicit business date must match the punch instant: the instant
/// falls on that IST date, or on the next one for a night shift.
fn check_instant_on(date: NaiveDate, at: DateTime<Utc>) -> AppResult<()> {
    let actual = business_date_for(at);
    if actual == date || date.succ_opt() == Some(actual) {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "punch time {} lies on {actual}, outside business date {date}",
        at.to_rfc3339()
    )))
}

fn is_open(session: &Session) -> bool {
    session.punch_in_time.is_some() && session.punch_out_time.is_none() && !session.status.is_frozen()
}

/// Session a punch-out closes. Without an explicit date, an open session
/// of the previous business date is closed when today's has none (punch-in
/// before IST midnight, punch-out after).
fn session_to_close(
    pool: &DbPool,
    user_id: i64,
    market_id: i64,
    at: DateTime<Utc>,
    date: Option<NaiveDate>,
) -> AppResult<Session> {
    let day = match date {
        Some(d) => {
            check_instant_on(d, at)?;
            d
        }
        None => business_date_for(at),
    };

    let same_day = find_session(&pool.conn, user_id, market_id, &day)?;
    if date.is_none()
        && !same_day.as_ref().is_some_and(is_open)
        && let Some(prev) = day.pred_opt()
        && let Some(open) = find_session(&pool.conn, user_id, market_id, &prev)?
        && is_open(&open)
    {
        tracing::debug!(session = open.id, "closing session of previous business date");
        return Ok(open);
    }

    same_day.ok_or_else(|| AppError::NotPunchedIn {
        user_id,
        date: format_date(&day),
    })
}

fn check_order(punch_in: DateTime<Utc>, out: DateTime<Utc>) -> AppResult<()> {
    if out < punch_in {
        return Err(AppError::PunchOutBeforeIn {
            punch_in: punch_in.to_rfc3339(),
            out: out.to_rfc3339(),
        });
    }
    Ok(())
}

impl PunchLogic {
    /// Punch in `user_id` at `market_id`. The business date defaults to the
    /// IST date of `at`.
    pub fn punch_in(
        pool: &mut DbPool,
        user_id: i64,
        market_id: i64,
        at: DateTime<Utc>,
        date: Option<NaiveDate>,
    ) -> AppResult<Session> {
        if let Some(d) = date {
            check_instant_on(d, at)?;
        }
        let date = date.unwrap_or_else(|| business_date_for(at));
        ensure_employee(&pool.conn, user_id)?;
        ensure_market(&pool.conn, market_id)?;

        let id = match find_session(&pool.conn, user_id, market_id, &date)? {
            Some(existing) => {
                frozen_guard(&existing)?;
                if existing.punch_in_time.is_some() {
                    return Err(AppError::AlreadyPunchedIn {
                        user_id,
                        date: format_date(&date),
                    });
                }
                set_punch_in(&pool.conn, existing.id, &at)?;
                existing.id
            }
            None => insert_session(&pool.conn, user_id, market_id, &date, &at)?,
        };

        audit_quietly(
            &pool.conn,
            "punch_in",
            &format!("session {id}"),
            &format!("employee {user_id} punched in at market {market_id} on {date}"),
        );

        load_session(&pool.conn, id)?.ok_or(AppError::SessionNotFound(id))
    }

    /// Punch out of the session of (`user_id`, `market_id`, date); the
    /// stored status becomes `completed`.
    pub fn punch_out(
        pool: &mut DbPool,
        user_id: i64,
        market_id: i64,
        at: DateTime<Utc>,
        date: Option<NaiveDate>,
    ) -> AppResult<Session> {
        let session = session_to_close(pool, user_id, market_id, at, date)?;
        let date = session.session_date;

        frozen_guard(&session)?;

        let punch_in = session.punch_in_time.ok_or_else(|| AppError::NotPunchedIn {
            user_id,
            date: format_date(&date),
        })?;

        if session.punch_out_time.is_some() {
            return Err(AppError::AlreadyPunchedOut(session.id));
        }

        check_order(punch_in, at)?;

        set_punch_out(&pool.conn, session.id, &at, SessionStatus::Completed)?;

        audit_quietly(
            &pool.conn,
            "punch_out",
            &format!("session {}", session.id),
            &format!("employee {user_id} punched out of market {market_id} on {date}"),
        );

        load_session(&pool.conn, session.id)?.ok_or(AppError::SessionNotFound(session.id))
    }

    /// BDO / market-manager punch-in: one session per employee and date.
    pub fn manager_punch_in(
        pool: &mut DbPool,
        user_id: i64,
        role: ManagerRole,
        at: DateTime<Utc>,
        date: Option<NaiveDate>,
    ) -> AppResult<ManagerSession> {
        if let Some(d) = date {
            check_instant_on(d, at)?;
        }
        let date = date.unwrap_or_else(|| business_date_for(at));
        ensure_employee(&pool.conn, user_id)?;

        if find_manager_session(&pool.conn, user_id, &date)?.is_some() {
            return Err(AppError::AlreadyPunchedIn {
                user_id,
                date: format_date(&date),
            });
        }

        let id = insert_manager_session(&pool.conn, user_id, role, &date, &at)?;

        audit_quietly(
            &pool.conn,
            "manager_punch_in",
            &format!("{} session {id}", role.to_db_str()),
            &format!("employee {user_id} punched in on {date}"),
        );

        find_manager_session(&pool.conn, user_id, &date)?.ok_or(AppError::SessionNotFound(id))
    }

    pub fn manager_punch_out(
        pool: &mut DbPool,
        user_id: i64,
        at: DateTime<Utc>,
        date: Option<NaiveDate>,
    ) -> AppResult<ManagerSession> {
        let session = manager_session_to_close(pool, user_id, at, date)?;
        let date = session.session_date;

        if session.punch_out_time.is_some() {
            return Err(AppError::AlreadyPunchedOut(session.id));
        }
        if let Some(punch_in) = session.punch_in_time {
            check_order(punch_in, at)?;
        }

        set_manager_punch_out(&pool.conn, session.id, &at)?;

        audit_quietly(
            &pool.conn,
            "manager_punch_out",
            &format!("{} session {}", session.role.to_db_str(), session.id),
            &format!("employee {user_id} punched out on {date}"),
        );

        find_manager_session(&pool.conn, user_id, &date)?
            .ok_or(AppError::SessionNotFound(session.id))
    }
}

/// Same lookup as [`session_to_close`] for BDO / market-manager sessions.
fn manager_session_to_close(
    pool: &DbPool,
    user_id: i64,
    at: DateTime<Utc>,
    date: Option<NaiveDate>,
) -> AppResult<ManagerSession> {
    let day = match date {
        Some(d) => {
            check_instant_on(d, at)?;
            d
        }
        None => business_date_for(at),
    };
    let open = |s: &ManagerSession| s.punch_in_time.is_some() && s.punch_out_time.is_none();

    let same_day = find_manager_session(&pool.conn, user_id, &day)?;
    if date.is_none()
        && !same_day.as_ref().is_some_and(open)
        && let Some(prev) = day.pred_opt()
        && let Some(earlier) = find_manager_session(&pool.conn, user_id, &prev)?
        && open(&earlier)
    {
        return Ok(earlier);
    }

    same_day.ok_or_else(|| AppError::NotPunchedIn {
        user_id,
        date: format_date(&day),
    })
}
