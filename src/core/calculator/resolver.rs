use crate::core::calculator::completion::TaskCompletion;
use crate::models::session::Session;
use crate::models::status::{StatusLabel, StatusSet};
use crate::models::task::Checklist;
use chrono::NaiveDate;

/// Display labels of a session in the admin sessions view.
///
/// `today` must be the IST business date (see `utils::date::business_today`).
/// Finalized and locked sessions show their stored status and nothing else.
pub fn resolve_statuses(
    session: &Session,
    completion: &TaskCompletion,
    today: NaiveDate,
) -> StatusSet {
    if let Some(frozen) = StatusSet::frozen(session.status) {
        return frozen;
    }

    let all_tasks_completed = completion.all_done(&Checklist::SESSION_REVIEW);
    if all_tasks_completed && session.is_punched_out() {
        return StatusSet::single(StatusLabel::Completed);
    }

    if session.session_date < today {
        StatusSet::pair(StatusLabel::Expired, StatusLabel::Incomplete)
    } else {
        StatusSet::single(StatusLabel::Incomplete)
    }
}
