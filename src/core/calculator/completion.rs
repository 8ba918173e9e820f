//! Task completion: which checklist entries a session has at least one row for.

use crate::models::session::Session;
use crate::models::task::{Checklist, TaskKind, TaskRow, TaskScope};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Presence index over a batch of task rows.
///
/// Built once per batch so that evaluating N sessions costs N × checklist
/// lookups instead of N × rows scans.
#[derive(Debug, Default)]
pub struct TaskIndex {
    by_session: HashSet<(TaskKind, i64)>,
    by_market: HashSet<(TaskKind, i64, NaiveDate, i64)>,
}

impl TaskIndex {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a TaskRow>,
    {
        let mut index = Self::default();
        for row in rows {
            index.insert(row);
        }
        index
    }

    /// Rows of unknown media type, or session-scoped rows without a
    /// session id, are not indexed.
    pub fn insert(&mut self, row: &TaskRow) {
        let Some(kind) = TaskKind::of_row(row) else {
            return;
        };

        match kind.scope() {
            TaskScope::Session => {
                if let Some(sid) = row.session_id {
                    self.by_session.insert((kind, sid));
                }
            }
            TaskScope::Market => {
                self.by_market
                    .insert((kind, row.market_id, row.date, row.user_id));
            }
        }
    }

    pub fn has(&self, kind: TaskKind, session: &Session) -> bool {
        match kind.scope() {
            TaskScope::Session => self.by_session.contains(&(kind, session.id)),
            TaskScope::Market => self.by_market.contains(&(
                kind,
                session.market_id,
                session.session_date,
                session.user_id,
            )),
        }
    }
}

/// Per-kind "did this task occur" flags of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCompletion {
    flags: BTreeMap<TaskKind, bool>,
}

impl TaskCompletion {
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = (TaskKind, bool)>,
    {
        Self {
            flags: flags.into_iter().collect(),
        }
    }

    /// A kind that was never evaluated counts as not done.
    pub fn is_done(&self, kind: TaskKind) -> bool {
        self.flags.get(&kind).copied().unwrap_or(false)
    }

    pub fn completed_count(&self) -> usize {
        self.flags.values().filter(|done| **done).count()
    }

    pub fn total(&self) -> usize {
        self.flags.len()
    }

    pub fn all_done(&self, checklist: &Checklist) -> bool {
        checklist.kinds.iter().all(|k| self.is_done(*k))
    }

    pub fn flags(&self) -> &BTreeMap<TaskKind, bool> {
        &self.flags
    }
}

/// Evaluate every kind of `checklist` for `session` against the index.
pub fn evaluate(session: &Session, index: &TaskIndex, checklist: &Checklist) -> TaskCompletion {
    TaskCompletion::from_flags(
        checklist
            .kinds
            .iter()
            .map(|kind| (*kind, index.has(*kind, session))),
    )
}
