use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::tasks::TaskLogic;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::queries::load_session;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::time::parse_optional_instant;

/// Handle the `plan` command
///
/// Planning and its stall confirmations are written one by one; when a
/// later write fails, the rows already written are deleted again before
/// the error is reported.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Plan {
        session,
        stalls,
        notes,
        at,
    } = &cli.command
    {
        let mut pool = DbPool::open_initialized(&cfg.database)?;
        let current = load_session(&pool.conn, *session)?.ok_or(AppError::SessionNotFound(*session))?;
        let at = parse_optional_instant(at.as_ref(), current.session_date)?;

        match TaskLogic::submit_planning(&mut pool, *session, stalls, notes, at) {
            Ok(written) => {
                if cli.json {
                    super::print_json(&written)?;
                } else {
                    success(format!(
                        "Planning saved for session {session} with {} stall confirmation(s)",
                        written.len().saturating_sub(1)
                    ));
                }
            }
            Err(partial) => {
                let steps = partial.completed_steps();
                if steps == 0 {
                    return Err(partial.into_error());
                }

                let outcome = partial.rollback(&pool.conn);
                audit_quietly(
                    &pool.conn,
                    "rollback",
                    &format!("session {session}"),
                    &format!(
                        "planning failed after {steps} write(s); {} row(s) removed, {} left",
                        outcome.removed,
                        outcome.remaining.len()
                    ),
                );
                if outcome.is_clean() {
                    warning(format!("Rolled back {} row(s) written before the failure", outcome.removed));
                } else {
                    warning(format!(
                        "Rollback incomplete: {} row(s) removed, {} still in place",
                        outcome.removed,
                        outcome.remaining.len()
                    ));
                }
                return Err(partial.into_error_after(outcome));
            }
        }
    }
    Ok(())
}
