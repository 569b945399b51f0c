//! Local-calendar date helpers.
//!
//! Log entries are keyed by the user's local calendar day. Everything here
//! works on `NaiveDate`, so day arithmetic is calendar arithmetic and never
//! sees a daylight-saving shift.

use crate::{Error, Result};
use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};

/// Storage format for date keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD` for the calendar day the instant falls on in its own zone
///
/// A `DateTime<Local>` at 23:30 stays on that local day; it is never
/// shifted to the next UTC day.
pub fn local_date_string<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    format_date(instant.date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date key
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("{:?}: {}", s, e)))
}

/// Signed number of days from `a` to `b` (`b - a`)
pub fn day_diff(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// The date `days` after `date` (negative goes back), saturating at the
/// representable range
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// String form of [`add_days`] for date keys
pub fn add_days_str(date: &str, days: i64) -> Result<String> {
    Ok(format_date(add_days(parse_date(date)?, days)))
}

/// Short month and day, e.g. `Mar 7`
pub fn month_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
