//! marketops library root.
//! Exposes the CLI parser, the high-level run() function and the status
//! engine modules (calculators, repository, models).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::AddMarket { .. } | Commands::AddEmployee { .. } => {
            cli::commands::register::handle(cli, cfg)
        }
        Commands::Punch { .. } | Commands::ManagerPunch { .. } => {
            cli::commands::punch::handle(cli, cfg)
        }
        Commands::Task { .. } => cli::commands::task::handle(cli, cfg),
        Commands::Plan { .. } => cli::commands::plan::handle(cli, cfg),
        Commands::Finalize { .. } => cli::commands::finalize::handle(cli, cfg),
        Commands::Status { .. } => cli::commands::status::handle(cli, cfg),
        Commands::Live { .. } => cli::commands::live::handle(cli, cfg),
        Commands::Sessions { .. } => cli::commands::sessions::handle(cli, cfg),
        Commands::Managers { .. } => cli::commands::managers::handle(cli, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Diagnostics go to stderr so stdout stays parseable with `--json`.
fn init_tracing(cfg: &Config, verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        cfg.log_level.parse().unwrap_or(tracing::Level::WARN)
    };

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    init_tracing(&cfg, cli.verbose);
    tracing::debug!(database = %cfg.database, "configuration loaded");

    dispatch(&cli, &cfg)
}
