use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// Creates the config directory and file (skipped with `--test`), opens the
/// SQLite database and applies every pending migration.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.as_deref(), cli.test)?;

    if !cli.json {
        println!("⚙️  Initializing marketops…");
        if !cli.test {
            println!("📄 Config file : {}", Config::config_file().display());
        }
        println!("🗄️  Database   : {}", &db_path);
    }

    let pool = DbPool::new(&db_path)?;
    let applied = init_db(&pool.conn)?;

    audit_quietly(
        &pool.conn,
        "init",
        "",
        &format!("Database initialized at {db_path} ({applied} migration(s) applied)"),
    );

    if cli.json {
        super::print_json(&serde_json::json!({
            "database": db_path,
            "migrations_applied": applied,
        }))?;
    } else {
        println!("✅ Database initialized at {} ({} migration(s) applied)", &db_path, applied);
    }
    Ok(())
}
