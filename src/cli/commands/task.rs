use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::tasks::TaskLogic;
use crate::db::pool::DbPool;
use crate::db::queries::load_session;
use crate::errors::{AppError, AppResult};
use crate::models::task::TaskKind;
use crate::ui::messages::success;
use crate::utils::time::parse_optional_instant;

/// Handle the `task` command
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Task {
        session,
        kind,
        stall,
        details,
        at,
    } = &cli.command
    {
        let kind = TaskKind::parse(kind).ok_or_else(|| AppError::InvalidTaskKind(kind.clone()))?;
        let mut pool = DbPool::open_initialized(&cfg.database)?;

        // HH:MM is read on the session's business date
        let current = load_session(&pool.conn, *session)?.ok_or(AppError::SessionNotFound(*session))?;
        let at = parse_optional_instant(at.as_ref(), current.session_date)?;

        let id = TaskLogic::record(&mut pool, *session, kind, *stall, details, at)?;

        if cli.json {
            super::print_json(&serde_json::json!({
                "id": id,
                "session_id": session,
                "kind": kind,
                "table": kind.table().table_name(),
            }))?;
        } else {
            success(format!("Recorded {kind} (row {id}) for session {session}"));
        }
    }
    Ok(())
}
