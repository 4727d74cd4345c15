//! Calendar helpers for deadline computation.
//!
//! Provides pure functions over `chrono::NaiveDate`:
//! - Date parsing (ISO, RFC 3339, registry `YYYYMMDD`)
//! - Day differences
//! - Calendar-safe year/month addition
//!
//! Month arithmetic clamps to the last valid day of the target month, so a
//! Feb 29 registration lands on Feb 28 in non-leap years.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Empty date string")]
    Empty,
    #[error("Invalid date: {0}")]
    Invalid(String),
}

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, ISO timestamps without an
/// offset, and the `YYYYMMDD` form used in registry bulk data. Timestamps
/// keep their local calendar date.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DateError::Empty);
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(datetime.date());
    }
    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y%m%d") {
            return Ok(date);
        }
    }

    Err(DateError::Invalid(text.to_string()))
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Add (or subtract, if negative) calendar months.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let delta = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(delta)
    } else {
        date.checked_sub_months(delta)
    }
}

/// Add calendar years.
pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    add_months(date, years.checked_mul(12)?)
}

/// Add years and months as a single month offset, so the day is clamped once.
pub fn add_years_months(date: NaiveDate, years: i32, months: i32) -> Option<NaiveDate> {
    let total = years.checked_mul(12)?.checked_add(months)?;
    add_months(date, total)
}

/// Step back a number of days.
pub fn subtract_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(days)))
}

/// Full anniversaries of `start` that have passed on `today`.
///
/// Zero when `today` precedes the first anniversary (or `start` itself).
pub fn whole_years_between(start: NaiveDate, today: NaiveDate) -> i32 {
    if today <= start {
        return 0;
    }
    let mut years = (today - start).num_days() as i32 / 366;
    while add_years(start, years + 1).is_some_and(|d| d <= today) {
        years += 1;
    }
    years
}

/// Source of "today" for callers that sit at a process boundary.
///
/// Library code takes `today` as an argument; only entry points consult a clock.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The system clock, read in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(parse_date("2015-03-01"), Ok(date("2015-03-01")));
        assert_eq!(parse_date("  2015-03-01 "), Ok(date("2015-03-01")));
        assert_eq!(parse_date("2015-03-01T10:30:00Z"), Ok(date("2015-03-01")));
        assert_eq!(parse_date("2015-03-01T23:30:00-05:00"), Ok(date("2015-03-01")));
        assert_eq!(parse_date("2015-03-01T00:00:00.000"), Ok(date("2015-03-01")));
        assert_eq!(parse_date("20150301"), Ok(date("2015-03-01")));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_date(""), Err(DateError::Empty));
        assert_eq!(parse_date("   "), Err(DateError::Empty));
        assert!(matches!(parse_date("not a date"), Err(DateError::Invalid(_))));
        assert!(matches!(parse_date("2015-02-30"), Err(DateError::Invalid(_))));
        assert!(matches!(parse_date("2015031"), Err(DateError::Invalid(_))));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date("2024-01-01"), date("2024-03-01")), 60);
        assert_eq!(days_between(date("2024-03-01"), date("2024-01-01")), -60);
        assert_eq!(days_between(date("2024-01-01"), date("2024-01-01")), 0);
    }

    #[test]
    fn test_add_years_months() {
        assert_eq!(add_years(date("2015-03-01"), 10), Some(date("2025-03-01")));
        assert_eq!(add_years_months(date("2015-03-01"), 9, 6), Some(date("2024-09-01")));
        assert_eq!(add_months(date("2024-03-31"), -1), Some(date("2024-02-29")));
        assert_eq!(add_months(date("2023-08-31"), 6), Some(date("2024-02-29")));
    }

    #[test]
    fn test_leap_day_clamps() {
        assert_eq!(add_years(date("2020-02-29"), 1), Some(date("2021-02-28")));
        assert_eq!(add_years(date("2020-02-29"), 4), Some(date("2024-02-29")));
        assert_eq!(add_years_months(date("2020-02-29"), 9, 6), Some(date("2029-08-29")));
    }

    #[test]
    fn test_out_of_range_is_none() {
        assert_eq!(add_years(NaiveDate::MAX, 1), None);
        assert_eq!(add_years(date("2015-03-01"), i32::MAX), None);
        assert_eq!(subtract_days(NaiveDate::MIN, 1), None);
    }

    #[test]
    fn test_subtract_days() {
        assert_eq!(subtract_days(date("2024-03-01"), 1), Some(date("2024-02-29")));
        assert_eq!(subtract_days(date("2024-03-01"), 0), Some(date("2024-03-01")));
    }

    #[test]
    fn test_whole_years_between() {
        let start = date("2015-03-01");
        assert_eq!(whole_years_between(start, date("2015-01-01")), 0);
        assert_eq!(whole_years_between(start, date("2024-01-01")), 8);
        assert_eq!(whole_years_between(start, date("2024-02-29")), 8);
        assert_eq!(whole_years_between(start, date("2024-03-01")), 9);
        assert_eq!(whole_years_between(date("2020-02-29"), date("2021-02-28")), 1);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(date("2024-01-01"));
        assert_eq!(clock.today(), date("2024-01-01"));
    }
}
