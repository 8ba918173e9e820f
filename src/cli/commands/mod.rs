pub mod config;
pub mod finalize;
pub mod init;
pub mod live;
pub mod log;
pub mod managers;
pub mod plan;
pub mod punch;
pub mod register;
pub mod sessions;
pub mod status;
pub mod task;

use crate::errors::{AppError, AppResult};
use crate::utils::date::{business_today, parse_date};
use chrono::NaiveDate;
use serde::Serialize;

/// Parse an optional `--date`-style argument.
pub(crate) fn parse_opt_date(input: Option<&String>) -> AppResult<Option<NaiveDate>> {
    input
        .map(|s| parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone())))
        .transpose()
}

/// Parse an optional date, defaulting to the current IST business date.
pub(crate) fn date_or_today(input: Option<&String>) -> AppResult<NaiveDate> {
    Ok(parse_opt_date(input)?.unwrap_or_else(business_today))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
