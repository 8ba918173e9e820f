use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::punch::PunchLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::session::ManagerRole;
use crate::ui::messages::success;
use crate::utils::date::business_today;
use crate::utils::time::{format_ist_time, parse_optional_instant};

use super::{parse_opt_date, print_json};

/// Handle `punch` (market sessions) and `manager-punch` (BDO sessions).
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Punch {
            employee,
            market,
            punch_in,
            at,
            date,
            ..
        } => {
            let date = parse_opt_date(date.as_ref())?;
            let at = parse_optional_instant(at.as_ref(), date.unwrap_or_else(business_today))?;
            let mut pool = DbPool::open_initialized(&cfg.database)?;

            let session = if *punch_in {
                PunchLogic::punch_in(&mut pool, *employee, *market, at, date)?
            } else {
                PunchLogic::punch_out(&mut pool, *employee, *market, at, date)?
            };

            if cli.json {
                print_json(&session)?;
            } else if *punch_in {
                success(format!(
                    "Session {} opened: employee {} at market {} on {} (in {})",
                    session.id,
                    employee,
                    market,
                    session.session_date,
                    format_ist_time(session.punch_in_time)
                ));
            } else {
                success(format!(
                    "Session {} closed at {} (status: {})",
                    session.id,
                    format_ist_time(session.punch_out_time),
                    session.status
                ));
            }
        }

        Commands::ManagerPunch {
            employee,
            role,
            punch_in,
            at,
            date,
            ..
        } => {
            let role = ManagerRole::from_db_str(role).ok_or_else(|| AppError::InvalidRole(role.clone()))?;
            let date = parse_opt_date(date.as_ref())?;
            let at = parse_optional_instant(at.as_ref(), date.unwrap_or_else(business_today))?;
            let mut pool = DbPool::open_initialized(&cfg.database)?;

            let session = if *punch_in {
                PunchLogic::manager_punch_in(&mut pool, *employee, role, at, date)?
            } else {
                PunchLogic::manager_punch_out(&mut pool, *employee, at, date)?
            };

            if cli.json {
                print_json(&session)?;
            } else {
                success(format!(
                    "{} session {} on {}: in {} / out {}",
                    session.role.to_db_str(),
                    session.id,
                    session.session_date,
                    format_ist_time(session.punch_in_time),
                    format_ist_time(session.punch_out_time)
                ));
            }
        }

        _ => {}
    }
    Ok(())
}
