use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::queries::{insert_employee, insert_market};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

/// Handle `add-market` and `add-employee`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let (entity, name) = match &cli.command {
        Commands::AddMarket { name } => ("market", name),
        Commands::AddEmployee { name } => ("employee", name),
        _ => return Ok(()),
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("{entity} name must not be empty")));
    }

    let pool = DbPool::open_initialized(&cfg.database)?;
    let id = match entity {
        "market" => insert_market(&pool.conn, name)?,
        _ => insert_employee(&pool.conn, name)?,
    };

    audit_quietly(
        &pool.conn,
        &format!("add_{entity}"),
        &format!("{entity} {id}"),
        &format!("registered {entity} '{name}'"),
    );

    if cli.json {
        super::print_json(&serde_json::json!({ "id": id, "name": name }))?;
    } else {
        success(format!("Registered {entity} '{name}' with id {id}"));
    }
    Ok(())
}
