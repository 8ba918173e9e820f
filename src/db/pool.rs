//! SQLite connection wrapper (lightweight for CLI usage).

use rusqlite::{Connection, Result};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open the database with foreign keys enforced.
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Open the database and bring its schema up to date.
    pub fn open_initialized(path: &str) -> crate::errors::AppResult<Self> {
        let pool = Self::new(path)?;
        crate::db::initialize::init_db(&pool.conn)?;
        Ok(pool)
    }
}
