//! Folding the sessions and task rows of a business date into per-market
//! summaries.

use crate::core::calculator::classifier::classify_by_tasks;
use crate::core::calculator::completion::{TaskIndex, evaluate};
use crate::models::market_summary::MarketSummary;
use crate::models::session::{Session, SessionStatus};
use crate::models::status::DayStatus;
use crate::models::task::{Checklist, TaskKind, TaskRow, TaskTable};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// How `active_employees` is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveRule {
    /// Sessions whose task-rule status is still `active` (nothing done).
    #[default]
    TaskBased,
    /// Distinct employees with a stored `active` session (live view).
    LiveSessions,
}

impl ActiveRule {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "task" | "tasks" | "task_based" => Some(ActiveRule::TaskBased),
            "live" | "sessions" | "live_sessions" => Some(ActiveRule::LiveSessions),
            _ => None,
        }
    }
}

/// Everything loaded for one business date, across any number of markets.
pub struct MarketDay<'a> {
    pub date: NaiveDate,
    pub sessions: &'a [Session],
    pub rows: &'a [TaskRow],
    index: TaskIndex,
}

impl<'a> MarketDay<'a> {
    pub fn new(date: NaiveDate, sessions: &'a [Session], rows: &'a [TaskRow]) -> Self {
        let index = TaskIndex::from_rows(rows.iter().filter(|r| r.date == date));
        Self {
            date,
            sessions,
            rows,
            index,
        }
    }
}

/// Summary of a single market.
pub fn aggregate(
    market_id: i64,
    market_name: &str,
    day: &MarketDay<'_>,
    rule: ActiveRule,
) -> MarketSummary {
    let sessions: Vec<&Session> = day
        .sessions
        .iter()
        .filter(|s| s.market_id == market_id && s.session_date == day.date)
        .collect();
    let rows: Vec<&TaskRow> = day
        .rows
        .iter()
        .filter(|r| r.market_id == market_id && r.date == day.date)
        .collect();

    summarize(market_id, market_name, &sessions, &rows, &day.index, rule)
}

/// Summaries of many markets from one batch, grouped in a single pass.
/// Output follows the order of `markets`.
pub fn aggregate_markets(
    markets: &[(i64, String)],
    day: &MarketDay<'_>,
    rule: ActiveRule,
) -> Vec<MarketSummary> {
    let mut sessions_by_market: HashMap<i64, Vec<&Session>> = HashMap::new();
    for s in day.sessions.iter().filter(|s| s.session_date == day.date) {
        sessions_by_market.entry(s.market_id).or_default().push(s);
    }

    let mut rows_by_market: HashMap<i64, Vec<&TaskRow>> = HashMap::new();
    for r in day.rows.iter().filter(|r| r.date == day.date) {
        rows_by_market.entry(r.market_id).or_default().push(r);
    }

    markets
        .iter()
        .map(|(id, name)| {
            let sessions = sessions_by_market.get(id).map(Vec::as_slice).unwrap_or(&[]);
            let rows = rows_by_market.get(id).map(Vec::as_slice).unwrap_or(&[]);
            summarize(*id, name, sessions, rows, &day.index, rule)
        })
        .collect()
}

fn summarize(
    market_id: i64,
    market_name: &str,
    sessions: &[&Session],
    rows: &[&TaskRow],
    index: &TaskIndex,
    rule: ActiveRule,
) -> MarketSummary {
    let mut summary = MarketSummary::empty(market_id, market_name);

    summary.active_employees = match rule {
        ActiveRule::TaskBased => sessions
            .iter()
            .filter(|s| {
                let completion = evaluate(s, index, &Checklist::EMPLOYEE_DAY);
                classify_by_tasks(completion.completed_count(), completion.total())
                    == DayStatus::Active
            })
            .count(),
        ActiveRule::LiveSessions => sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Active)
            .map(|s| s.user_id)
            .collect::<HashSet<_>>()
            .len(),
    };

    for row in rows {
        match row.table {
            TaskTable::StallConfirmations => {
                summary.stall_confirmations_count += 1;
                bump_last_activity(&mut summary, row.created_at);
            }
            TaskTable::Media => {
                summary.media_uploads_count += 1;
                bump_last_activity(&mut summary, row.activity_time());
            }
            _ => {}
        }

        if let Some(kind) = TaskKind::of_row(row) {
            *summary.task_stats.entry(kind).or_insert(0) += 1;
        }
    }

    summary
}

fn bump_last_activity(summary: &mut MarketSummary, at: chrono::DateTime<chrono::Utc>) {
    summary.last_upload_time = Some(match summary.last_upload_time {
        Some(prev) if prev >= at => prev,
        _ => at,
    });
}
