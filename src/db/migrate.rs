//! Schema migrations.
//!
//! Each migration runs once; applied versions are recorded in the `log`
//! table with operation `migration_applied`.

use rusqlite::{Connection, OptionalExtension, Result, params};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250601_0001_core_tables",
        description: "Create markets, employees and sessions",
        sql: r#"
        CREATE TABLE IF NOT EXISTS markets (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS employees (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES employees(id),
            market_id       INTEGER NOT NULL REFERENCES markets(id),
            session_date    TEXT NOT NULL,
            punch_in_time   TEXT,
            punch_out_time  TEXT,
            status          TEXT NOT NULL DEFAULT 'active'
                            CHECK (status IN ('active','completed','finalized','locked')),
            created_at      TEXT NOT NULL,
            UNIQUE (user_id, market_id, session_date)
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_market_date ON sessions(market_id, session_date);
        CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(session_date);
        "#,
    },
    Migration {
        version: "20250601_0002_task_tables",
        description: "Create the seven task tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS offers (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER REFERENCES sessions(id),
            market_id   INTEGER NOT NULL,
            user_id     INTEGER NOT NULL,
            date        TEXT NOT NULL,
            details     TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_offers_market_date ON offers(market_id, date);

        CREATE TABLE IF NOT EXISTS non_available_commodities (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER REFERENCES sessions(id),
            market_id   INTEGER NOT NULL,
            user_id     INTEGER NOT NULL,
            date        TEXT NOT NULL,
            details     TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_nac_market_date ON non_available_commodities(market_id, date);

        CREATE TABLE IF NOT EXISTS organiser_feedback (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER REFERENCES sessions(id),
            market_id   INTEGER NOT NULL,
            user_id     INTEGER NOT NULL,
            date        TEXT NOT NULL,
            details     TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_feedback_market_date ON organiser_feedback(market_id, date);

        CREATE TABLE IF NOT EXISTS stall_inspections (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER REFERENCES sessions(id),
            market_id   INTEGER NOT NULL,
            user_id     INTEGER NOT NULL,
            date        TEXT NOT NULL,
            details     TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_inspections_market_date ON stall_inspections(market_id, date);

        CREATE TABLE IF NOT EXISTS next_day_planning (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER REFERENCES sessions(id),
            market_id   INTEGER NOT NULL,
            user_id     INTEGER NOT NULL,
            date        TEXT NOT NULL,
            details     TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_planning_market_date ON next_day_planning(market_id, date);

        CREATE TABLE IF NOT EXISTS stall_confirmations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER REFERENCES sessions(id),
            market_id   INTEGER NOT NULL,
            user_id     INTEGER NOT NULL,
            date        TEXT NOT NULL,
            stall_no    INTEGER NOT NULL CHECK (stall_no > 0),
            details     TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL,
            UNIQUE (market_id, date, stall_no)
        );
        CREATE INDEX IF NOT EXISTS idx_confirmations_market_date ON stall_confirmations(market_id, date);

        CREATE TABLE IF NOT EXISTS media (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id   INTEGER REFERENCES sessions(id),
            market_id    INTEGER NOT NULL,
            user_id      INTEGER NOT NULL,
            date         TEXT NOT NULL,
            media_type   TEXT NOT NULL,
            file_url     TEXT NOT NULL DEFAULT '',
            details      TEXT NOT NULL DEFAULT '',
            captured_at  TEXT,
            created_at   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_media_market_date ON media(market_id, date);
        CREATE INDEX IF NOT EXISTS idx_media_session ON media(session_id);
        "#,
    },
    Migration {
        version: "20250615_0003_manager_sessions",
        description: "Create bdo_sessions for BDO and market-manager attendance",
        sql: r#"
        CREATE TABLE IF NOT EXISTS bdo_sessions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES employees(id),
            role            TEXT NOT NULL DEFAULT 'bdo'
                            CHECK (role IN ('bdo','market_manager')),
            session_date    TEXT NOT NULL,
            punch_in_time   TEXT,
            punch_out_time  TEXT,
            created_at      TEXT NOT NULL,
            UNIQUE (user_id, session_date)
        );

        CREATE INDEX IF NOT EXISTS idx_bdo_sessions_date ON bdo_sessions(session_date);
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![m.version, m.description],
    )?;
    tx.commit()
}

/// Public entry point: run all pending migrations, returning how many ran.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        apply(conn, m)?;
        tracing::info!(version = m.version, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
