use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_in_out, colorize_optional};
use crate::utils::formatting::badge;
use crate::utils::table::Table;
use crate::utils::time::{format_ist_time, format_optional_minutes};

/// Handle the `managers` command: time-based BDO / market-manager status.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Managers { date } = &cli.command {
        let date = super::date_or_today(date.as_ref())?;
        let mut pool = DbPool::open_initialized(&cfg.database)?;
        let statuses = AttendanceLogic::manager_statuses(&mut pool, date, cfg.thresholds())?;

        if cli.json {
            return super::print_json(&statuses);
        }

        header(format!(
            "Managers on {date} (full day ≥ {}h, half day ≥ {}h)",
            cfg.full_day_hours, cfg.half_day_hours
        ));
        if statuses.is_empty() {
            info("No manager sessions for this date.");
            return Ok(());
        }

        let mut table = Table::with_headers(&["SESSION", "", "NAME", "ROLE", "STATUS", "IN", "OUT", "WORKED"]);
        for s in &statuses {
            table.add_row(vec![
                s.session_id.to_string(),
                s.initials.clone(),
                s.name.clone(),
                s.role.to_db_str().to_string(),
                badge(s.status.as_str()),
                colorize_in_out(&format_ist_time(s.punch_in_time), true),
                colorize_in_out(&format_ist_time(s.punch_out_time), false),
                colorize_optional(&format_optional_minutes(s.duration_minutes)),
            ]);
        }
        print!("{}", table.render());
    }
    Ok(())
}
