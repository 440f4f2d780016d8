use chrono::{Datelike, NaiveDate};

/// Builds the storage key for a day. `month0` is zero-based and nothing is
/// padded, so January 5, 2025 is `"2025-0-5"`.
pub fn day_key(year: i32, month0: u32, day: u32) -> String {
    format!("{}-{}-{}", year, month0, day)
}

/// Inverse of [`day_key`]. Splits from the right so a leading minus sign on
/// the year survives.
pub fn parse_day_key(key: &str) -> Option<(i32, u32, u32)> {
    let mut parts = key.rsplitn(3, '-');
    let day = parts.next()?.parse::<u32>().ok()?;
    let month0 = parts.next()?.parse::<u32>().ok()?;
    let year = parts.next()?.parse::<i32>().ok()?;
    Some((year, month0, day))
}

pub fn date_key(date: NaiveDate) -> String {
    day_key(date.year(), date.month0(), date.day())
}

/// Returns the calendar date a key refers to, or `None` for malformed or
/// impossible keys such as `"2025-1-30"`.
pub fn key_to_date(key: &str) -> Option<NaiveDate> {
    let (year, month0, day) = parse_day_key(key)?;
    NaiveDate::from_ymd_opt(year, month0 + 1, day)
}

pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let (next_year, next_month0) = shift_month(year, month0, 1);
    match (
        NaiveDate::from_ymd_opt(next_year, next_month0 + 1, 1),
        NaiveDate::from_ymd_opt(year, month0 + 1, 1),
    ) {
        (Some(next), Some(first)) => next.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

/// Weekday of the 1st of the month, Sunday = 0.
pub fn first_weekday(year: i32, month0: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Moves `delta` months away from (`year`, `month0`), crossing year boundaries.
pub fn shift_month(year: i32, month0: u32, delta: i32) -> (i32, u32) {
    let total = month0 as i32 + delta;
    let new_year = year + total.div_euclid(12);
    let new_month0 = total.rem_euclid(12) as u32;
    (new_year, new_month0)
}

pub fn month_name(month0: u32) -> &'static str {
    match month0 {
        0 => "January",
        1 => "February",
        2 => "March",
        3 => "April",
        4 => "May",
        5 => "June",
        6 => "July",
        7 => "August",
        8 => "September",
        9 => "October",
        10 => "November",
        11 => "December",
        _ => "Unknown",
    }
}

/// Label shown above the grid, e.g. "March 2025".
pub fn month_label(year: i32, month0: u32) -> String {
    format!("{} {}", month_name(month0), year)
}
