//! Multi-step writes with a compensating rollback.
//!
//! Steps are committed one by one. When a later step fails, the caller
//! receives a [`PartialWrite`] listing what was already written and must
//! decide whether to call [`PartialWrite::rollback`].

use crate::db::queries::{NewTaskRow, delete_task_row, insert_task_row};
use crate::errors::AppError;
use crate::models::task::TaskTable;
use rusqlite::Connection;
use serde::Serialize;
use std::fmt;

/// A row written by a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WrittenRow {
    pub table: TaskTable,
    pub id: i64,
}

impl fmt::Display for WrittenRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.table.table_name(), self.id)
    }
}

pub struct WriteSequence<'c> {
    conn: &'c Connection,
    written: Vec<WrittenRow>,
}

impl<'c> WriteSequence<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            written: Vec::new(),
        }
    }

    /// Insert one task row as the next step.
    pub fn insert(&mut self, row: &NewTaskRow) -> Result<i64, PartialWrite> {
        match insert_task_row(self.conn, row) {
            Ok(id) => {
                self.written.push(WrittenRow {
                    table: row.kind.table(),
                    id,
                });
                Ok(id)
            }
            Err(error) => Err(self.interrupt(error)),
        }
    }

    /// Stop the sequence with `error`, keeping track of what was written.
    pub fn interrupt(&mut self, error: AppError) -> PartialWrite {
        PartialWrite {
            written: std::mem::take(&mut self.written),
            error,
        }
    }

    pub fn finish(self) -> Vec<WrittenRow> {
        self.written
    }
}

/// A sequence that stopped part-way.
#[derive(Debug)]
pub struct PartialWrite {
    pub written: Vec<WrittenRow>,
    pub error: AppError,
}

impl PartialWrite {
    /// Delete the written rows, most recent first. Every row is attempted;
    /// rows whose delete fails are reported back in the outcome.
    pub fn rollback(&self, conn: &Connection) -> RollbackOutcome {
        let mut outcome = RollbackOutcome::default();
        for row in self.written.iter().rev() {
            match delete_task_row(conn, row.table, row.id) {
                Ok(n) => outcome.removed += n,
                Err(e) => {
                    tracing::error!(row = %row, error = %e, "compensating delete failed");
                    outcome.remaining.push(*row);
                    outcome.failures.push(e);
                }
            }
        }
        tracing::warn!(
            removed = outcome.removed,
            remaining = outcome.remaining.len(),
            "rolled back partial write"
        );
        outcome
    }

    pub fn completed_steps(&self) -> usize {
        self.written.len()
    }

    /// Error to report: the original one when nothing was written yet.
    pub fn into_error(self) -> AppError {
        if self.written.is_empty() {
            self.error
        } else {
            AppError::PartialWrite {
                completed: self.written.len(),
                source: Box::new(self.error),
            }
        }
    }

    /// Error to report after `rollback`: the original failure, plus the
    /// rows still in place when some compensating delete failed.
    pub fn into_error_after(self, mut outcome: RollbackOutcome) -> AppError {
        if outcome.is_clean() {
            return self.into_error();
        }
        let remaining = outcome
            .remaining
            .iter()
            .map(WrittenRow::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        AppError::RollbackIncomplete {
            completed: self.written.len(),
            remaining,
            cleanup: Box::new(outcome.failures.remove(0)),
            source: Box::new(self.error),
        }
    }
}

/// Result of a compensating rollback.
#[derive(Debug, Default)]
pub struct RollbackOutcome {
    pub removed: usize,
    /// Rows whose delete failed, most recent first.
    pub remaining: Vec<WrittenRow>,
    pub failures: Vec<AppError>,
}

impl RollbackOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
