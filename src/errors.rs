//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid session status: {0}")]
    InvalidStatus(String),

    #[error("Invalid task kind: {0}")]
    InvalidTaskKind(String),

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // ---------------------------
    // Session lifecycle
    // ---------------------------
    #[error("Session {0} not found")]
    SessionNotFound(i64),

    #[error("Session {id} is {status} and can no longer be changed")]
    SessionImmutable { id: i64, status: String },

    #[error("Employee {user_id} already punched in on {date}")]
    AlreadyPunchedIn { user_id: i64, date: String },

    #[error("Employee {user_id} has no open session on {date}")]
    NotPunchedIn { user_id: i64, date: String },

    #[error("Session {0} is already punched out")]
    AlreadyPunchedOut(i64),

    #[error("Punch-out {out} is earlier than punch-in {punch_in}")]
    PunchOutBeforeIn { punch_in: String, out: String },

    #[error("Unknown {entity} id: {id}")]
    UnknownId { entity: &'static str, id: i64 },

    // ---------------------------
    // Validation / writes
    // ---------------------------
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Write interrupted after {completed} step(s): {source}")]
    PartialWrite {
        completed: usize,
        #[source]
        source: Box<AppError>,
    },

    #[error(
        "Write interrupted after {completed} step(s): {source}; rollback failed ({cleanup}), rows left in place: {remaining}"
    )]
    RollbackIncomplete {
        completed: usize,
        remaining: String,
        cleanup: Box<AppError>,
        #[source]
        source: Box<AppError>,
    },

    // ---------------------------
    // Config / serialization
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
