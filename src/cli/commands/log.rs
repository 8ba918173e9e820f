use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = DbPool::open_initialized(&cfg.database)?;
        print!("{}", LogLogic::render(&pool.conn)?);
    }

    Ok(())
}
