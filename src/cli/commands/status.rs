use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::day_summary::EmployeeStatus;
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_in_out, colorize_optional};
use crate::utils::formatting::badge;
use crate::utils::table::Table;
use crate::utils::time::{format_ist_time, format_optional_minutes};

/// Handle the `status` command: task-based attendance of one market.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { market, date } = &cli.command {
        let date = super::date_or_today(date.as_ref())?;
        let mut pool = DbPool::open_initialized(&cfg.database)?;
        let statuses = AttendanceLogic::employee_statuses(&mut pool, *market, date)?;

        if cli.json {
            return super::print_json(&statuses);
        }

        header(format!("Attendance at market {market} on {date}"));
        if statuses.is_empty() {
            info("No sessions for this market and date.");
            return Ok(());
        }
        print!("{}", render(&statuses));
    }
    Ok(())
}

fn render(statuses: &[EmployeeStatus]) -> String {
    let mut table = Table::with_headers(&[
        "SESSION", "", "EMPLOYEE", "STATUS", "IN", "OUT", "WORKED", "TASKS",
    ]);
    for s in statuses {
        table.add_row(vec![
            s.session_id.to_string(),
            s.initials.clone(),
            s.name.clone(),
            badge(s.status.as_str()),
            colorize_in_out(&format_ist_time(s.punch_in_time), true),
            colorize_in_out(&format_ist_time(s.punch_out_time), false),
            colorize_optional(&format_optional_minutes(s.duration_minutes)),
            format!("{}/{}", s.completed_tasks, s.total_tasks),
        ]);
    }
    table.render()
}
