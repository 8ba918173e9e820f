use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::sessions::SessionLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Finalize { session, lock } = &cli.command {
        let mut pool = DbPool::open_initialized(&cfg.database)?;
        let updated = SessionLogic::finalize(&mut pool, *session, *lock)?;

        if cli.json {
            super::print_json(&updated)?;
        } else {
            success(format!("Session {} is now {}", updated.id, updated.status));
        }
    }
    Ok(())
}
