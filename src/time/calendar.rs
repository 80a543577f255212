//! Calendar date and Julian date conversion functions
//!
//! Conversions follow the Explanatory Supplement to the Astronomical Almanac
//! 15.11 in its Gregorian form. Dates before the Gregorian reform are
//! rejected rather than mapped onto the proleptic calendar.

use super::{Instant, Result, TimeError};
use crate::constants::{DAY_S, GREGORIAN_START, LAST_YEAR};

/// Calendar date and time of day derived from an [`Instant`]
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
    /// Fraction of the civil day elapsed since midnight, in [0, 1)
    pub day_fraction: f64,
}

impl CalendarDate {
    /// Day of the month with the time of day as fractional part
    pub fn fractional_day(&self) -> f64 {
        self.day as f64 + self.day_fraction
    }

    /// Calendar date without the time of day
    pub fn ymd(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }
}

/// Whether `year` is a Gregorian leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Convert Julian day number to calendar date (year, month, day)
pub fn julian_day_to_calendar_date(jd: i32) -> (i32, u32, u32) {
    let f = jd + 1401 + (4 * jd + 274_277) / 146_097 * 3 / 4 - 38;
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;

    let day = (h % 153) / 5 + 1;
    let month = (h / 153 + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;

    (year, month as u32, day as u32)
}

/// Convert calendar date (year, month, day) to Julian day number
pub fn julian_day(year: i32, month: u32, day: u32) -> i32 {
    let janfeb = month <= 2;
    let g = year + 4716 - if janfeb { 1 } else { 0 };
    let f = (month as i32 + 9) % 12;
    let e = 1461 * g / 4 + day as i32 - 1402;
    let j = e + (153 * f + 2) / 5;

    j + 38 - (g + 184) / 100 * 3 / 4
}

/// Convert an instant to calendar fields
///
/// Julian dates start at noon, so the civil day boundary sits at `.5`.
pub fn to_calendar(instant: Instant) -> Result<CalendarDate> {
    let jd = instant.checked()?.jd();

    let jd_plus_half = jd + 0.5;
    let z = jd_plus_half.floor();
    let day_fraction = jd_plus_half - z;

    let (year, month, day) = julian_day_to_calendar_date(z as i32);

    let seconds_in_day = day_fraction * DAY_S;
    let hour = ((seconds_in_day / 3600.0).floor() as u32).min(23);
    let minute = (((seconds_in_day - hour as f64 * 3600.0) / 60.0).floor() as u32).min(59);
    let second = (seconds_in_day - hour as f64 * 3600.0 - minute as f64 * 60.0).max(0.0);

    Ok(CalendarDate {
        year,
        month,
        day,
        hour,
        minute,
        second,
        day_fraction,
    })
}

/// Convert (year, month, day) to an instant
///
/// `day` may carry the time of day as its fractional part, so
/// `to_instant(2000, 1, 1.5)` is J2000.0.
pub fn to_instant(year: i32, month: u32, day: f64) -> Result<Instant> {
    let invalid = TimeError::InvalidCalendarDate { year, month, day };
    if !day.is_finite() || !(1..=12).contains(&month) {
        return Err(invalid);
    }
    // Keeps the i32 day-number arithmetic in range
    if !(1582..=LAST_YEAR).contains(&year) {
        return Err(TimeError::OutOfRange(f64::from(year)));
    }
    let whole = day.floor();
    if whole < 1.0 || whole > days_in_month(year, month) as f64 {
        return Err(invalid);
    }

    let jdn = julian_day(year, month, whole as u32);
    if jdn < GREGORIAN_START {
        return Err(TimeError::OutOfRange(jdn as f64 - 0.5));
    }
    Instant::from_jd(jdn as f64 - 0.5 + (day - whole))
}

/// Day of the week, 0 = Sunday through 6 = Saturday
///
/// MJD 0 (1858-11-17) was a Wednesday.
pub fn day_of_week(instant: Instant) -> u32 {
    (instant.mjd().floor() as i64 + 3).rem_euclid(7) as u32
}

/// Format the calendar date as `YYYY-MM-DD`
pub fn format_date(instant: Instant) -> Result<String> {
    let cal = to_calendar(instant)?;
    Ok(format!("{:04}-{:02}-{:02}", cal.year, cal.month, cal.day))
}

/// Format the calendar date as `YYYY MON DD` using the given month names
pub fn format_date_with_names(instant: Instant, month_names: &[String; 12]) -> Result<String> {
    let cal = to_calendar(instant)?;
    Ok(format!(
        "{:04} {} {:02}",
        cal.year,
        month_names[(cal.month - 1) as usize],
        cal.day
    ))
}

/// Format the time of day as `HH:MM` or `HH:MM:SS`, rounded to the nearest
/// displayed unit
pub fn format_time(instant: Instant, with_seconds: bool) -> Result<String> {
    let half_unit = if with_seconds { 0.5 } else { 30.0 };
    let cal = to_calendar(instant + half_unit / DAY_S)?;
    if with_seconds {
        Ok(format!(
            "{:02}:{:02}:{:02}",
            cal.hour,
            cal.minute,
            cal.second.floor() as u32
        ))
    } else {
        Ok(format!("{:02}:{:02}", cal.hour, cal.minute))
    }
}
