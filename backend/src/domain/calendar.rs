//! Calendar utilities for due-date evaluation.
//!
//! Pure, total functions over valid calendar dates. The whole application
//! works on one calendar: the UTC civil date. `today_utc` is the only
//! clock read; everything below the outermost shells takes the reference
//! date as an explicit parameter so date-boundary behavior is testable.

use chrono::{Datelike, Duration, NaiveDate, Utc};

/// Current date in UTC, truncated to day granularity.
///
/// This is the single timezone policy for both the interactive client
/// paths and the digest job, so the two can never disagree about which
/// date is "today".
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Calendar-correct day arithmetic (crosses month and year boundaries).
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// ISO-8601 weekday number: Monday = 1 .. Sunday = 7.
///
/// Deliberate remap from representations where Sunday is day 0; weekly
/// repetition rules store their weekday sets in this numbering.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// The Monday on or before `date`. A Monday maps to itself.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    add_days(date, -offset)
}
