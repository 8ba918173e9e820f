use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::calculator::aggregator::ActiveRule;
use crate::core::live_market::LiveMarketLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::market_summary::MarketSummary;
use crate::ui::messages::{header, info};
use crate::utils::colors::colorize_optional;
use crate::utils::table::Table;
use crate::utils::time::format_ist_time;

/// Handle the `live` command: per-market activity for one business date.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Live { markets, date, rule } = &cli.command {
        let rule = ActiveRule::parse(rule)
            .ok_or_else(|| AppError::Validation(format!("unknown rule '{rule}' (expected live or task)")))?;
        let date = super::date_or_today(date.as_ref())?;
        let mut pool = DbPool::open_initialized(&cfg.database)?;
        let summaries = LiveMarketLogic::summaries(&mut pool, markets, date, rule)?;

        if cli.json {
            return super::print_json(&summaries);
        }

        header(format!("Live markets on {date}"));
        if summaries.is_empty() {
            info("No markets registered.");
            return Ok(());
        }
        print!("{}", render(&summaries));
    }
    Ok(())
}

fn render(summaries: &[MarketSummary]) -> String {
    let mut table = Table::with_headers(&["ID", "MARKET", "ACTIVE", "STALLS", "MEDIA", "LAST UPLOAD", "TASKS"]);
    for m in summaries {
        let tasks = m
            .task_stats
            .iter()
            .map(|(kind, n)| format!("{kind}:{n}"))
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(vec![
            m.market_id.to_string(),
            m.market_name.clone(),
            m.active_employees.to_string(),
            colorize_optional(&m.stall_confirmations_count.to_string()),
            colorize_optional(&m.media_uploads_count.to_string()),
            colorize_optional(&format_ist_time(m.last_upload_time)),
            tasks,
        ]);
    }
    table.render()
}
