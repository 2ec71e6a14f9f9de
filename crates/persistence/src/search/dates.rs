//! Calendar-day helpers for date criteria and derived date fields.
//!
//! All day boundaries are computed in UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

/// Returns midnight (UTC) of the day `date` falls on.
pub fn start_of_day(date: DateTime<Utc>) -> DateTime<Utc> {
    date.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Returns the last millisecond of the day before `date`, or `None` when that
/// instant is before the earliest representable date.
///
/// `2020-05-01T15:00:00Z` becomes `2020-04-30T23:59:59.999Z`.
pub fn end_of_previous_day(date: DateTime<Utc>) -> Option<DateTime<Utc>> {
    start_of_day(date).checked_sub_signed(TimeDelta::milliseconds(1))
}

/// Returns midnight of the day after `date`, or `None` when that instant is
/// past the latest representable date.
///
/// `2020-05-01T15:00:00Z` becomes `2020-05-02T00:00:00Z`.
pub fn start_of_next_day(date: DateTime<Utc>) -> Option<DateTime<Utc>> {
    start_of_day(date).checked_add_signed(TimeDelta::days(1))
}

/// Parses a partial calendar date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`) to the
/// start of the first day it covers.
///
/// Returns `None` for anything else, including out-of-range months and days.
pub fn parse_partial_date(value: &str) -> Option<DateTime<Utc>> {
    let clean = value.trim();
    let parts: Vec<&str> = clean.split('-').collect();

    let expected_widths: &[usize] = match parts.len() {
        1 => &[4],
        2 => &[4, 2],
        3 => &[4, 2, 2],
        _ => return None,
    };
    let well_formed = parts
        .iter()
        .zip(expected_widths)
        .all(|(part, width)| part.len() == *width && part.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts.get(1).map_or(Some(1), |p| p.parse().ok())?;
    let day: u32 = parts.get(2).map_or(Some(1), |p| p.parse().ok())?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}
