//! Week arithmetic for weekly assignments.
//!
//! A week is identified by the date of its Monday.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::{Error, Result};

/// The Monday of the week containing `date`.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
  date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The Monday of the current local week.
pub fn current_week_start() -> NaiveDate { week_start_of(today()) }

/// Today's local date.
pub fn today() -> NaiveDate { Local::now().date_naive() }

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}
