use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::sessions::SessionLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::date::{business_today, format_date};
use crate::utils::formatting::badge;
use crate::utils::table::Table;

use super::parse_opt_date;

/// Handle the `sessions` command: the admin "all sessions" view.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Sessions {
        from,
        to,
        market,
        today,
    } = &cli.command
    {
        let today = parse_opt_date(today.as_ref())?.unwrap_or_else(business_today);
        let from = parse_opt_date(from.as_ref())?.unwrap_or(today);
        let to = parse_opt_date(to.as_ref())?.unwrap_or(from);

        let mut pool = DbPool::open_initialized(&cfg.database)?;
        let rows = SessionLogic::overview(&mut pool, from, to, *market, today)?;

        if cli.json {
            return super::print_json(&rows);
        }

        header(format!("Sessions {} → {}", format_date(&from), format_date(&to)));
        if rows.is_empty() {
            info("No sessions in this range.");
            return Ok(());
        }

        let mut table = Table::with_headers(&["ID", "DATE", "EMPLOYEE", "MARKET", "STORED", "LABELS", "TASKS"]);
        for r in &rows {
            let labels = r.labels.iter().map(|l| badge(l.as_str())).collect::<Vec<_>>().join(", ");
            table.add_row(vec![
                r.session_id.to_string(),
                format_date(&r.session_date),
                r.employee_name.clone(),
                r.market_name.clone(),
                r.stored_status.to_string(),
                labels,
                format!("{}/{}", r.completed_tasks, r.total_tasks),
            ]);
        }
        print!("{}", table.render());
    }
    Ok(())
}
