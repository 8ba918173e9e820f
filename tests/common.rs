#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use marketops::db::pool::DbPool;
use marketops::models::session::{Session, SessionStatus};
use marketops::models::task::{MediaType, TaskRow, TaskTable};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn mops() -> Command {
    cargo_bin_cmd!("marketops")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_marketops.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// `--db <path> --test init`
pub fn init_cli_db(db_path: &str) {
    mops()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Fresh, migrated database opened through the library.
pub fn open_test_pool(name: &str) -> DbPool {
    let db_path = setup_test_db(name);
    DbPool::open_initialized(&db_path).expect("open test db")
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

/// UTC instant for an IST wall-clock time on `date` (`HH:MM`).
pub fn ist(date: &str, hhmm: &str) -> DateTime<Utc> {
    marketops::utils::time::parse_instant(hhmm, d(date)).expect("valid time")
}

pub fn utc(y: i32, m: u32, day: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, day, h, min, s).single().expect("valid instant")
}

pub fn session(
    id: i64,
    user_id: i64,
    market_id: i64,
    date: &str,
    punch_in: Option<DateTime<Utc>>,
    punch_out: Option<DateTime<Utc>>,
    status: SessionStatus,
) -> Session {
    Session {
        id,
        user_id,
        market_id,
        session_date: d(date),
        punch_in_time: punch_in,
        punch_out_time: punch_out,
        status,
    }
}

/// Task row tied to `s` (session id, market, user and date copied over).
pub fn row_for(s: &Session, table: TaskTable, id: i64, created_at: DateTime<Utc>) -> TaskRow {
    TaskRow {
        table,
        id,
        session_id: Some(s.id),
        market_id: s.market_id,
        user_id: s.user_id,
        date: s.session_date,
        media_type: None,
        stall_no: None,
        created_at,
        captured_at: None,
    }
}

pub fn media_for(
    s: &Session,
    id: i64,
    media_type: Option<MediaType>,
    created_at: DateTime<Utc>,
    captured_at: Option<DateTime<Utc>>,
) -> TaskRow {
    TaskRow {
        media_type,
        captured_at,
        ..row_for(s, TaskTable::Media, id, created_at)
    }
}

pub fn stall_for(s: &Session, id: i64, stall_no: i64, created_at: DateTime<Utc>) -> TaskRow {
    TaskRow {
        stall_no: Some(stall_no),
        ..row_for(s, TaskTable::StallConfirmations, id, created_at)
    }
}
