//! Business-date helpers.
//!
//! Every "today" in marketops is the calendar date in India Standard Time
//! (UTC+05:30, no DST), whatever the locale of the machine running it.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

/// IST offset from UTC, in seconds.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Fixed IST offset. `east_opt` only fails outside ±24h.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Calendar date in IST for the given instant.
pub fn business_date_for(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&ist()).date_naive()
}

/// Today's business date.
pub fn business_today() -> NaiveDate {
    business_date_for(Utc::now())
}

/// Midnight IST of `date`, as a UTC instant.
pub fn start_of_business_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    ist()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
