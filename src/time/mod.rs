//! Time module for the simulation clock
//!
//! Every quantity the engine computes is a function of a single continuous
//! Julian Date, wrapped here as [`Instant`]. Calendar fields (year, month,
//! day, time of day, weekday) are always derived from it and never stored.
//!
//! Submodules:
//! - `calendar`: Gregorian calendar conversion and HUD formatting
//! - `sidereal`: Greenwich and local mean sidereal time

pub mod calendar;
pub mod sidereal;

pub use calendar::{day_of_week, format_date, format_time, to_calendar, to_instant, CalendarDate};
pub use sidereal::{greenwich_sidereal_time, local_sidereal_time};

use crate::constants::{
    CALENDAR_END_JD, DAY_S, GREGORIAN_START_JD, J2000, JULIAN_CENTURY, MJD_OFFSET, UNIX_EPOCH_JD,
};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use thiserror::Error;

/// Error type for time operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeError {
    #[error("Time out of range: JD {0} is outside 1582-10-15 to 9999-12-31")]
    OutOfRange(f64),

    #[error("Julian date is not a finite number: {0}")]
    NonFinite(f64),

    #[error("Invalid calendar date: {year:04}-{month:02}-{day}")]
    InvalidCalendarDate { year: i32, month: u32, day: f64 },
}

/// Result type for time operations
pub type Result<T> = std::result::Result<T, TimeError>;

/// Which wall clock [`now`] reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimezoneMode {
    /// Coordinated Universal Time
    #[default]
    Utc,
    /// The host's local civil time, read as if it were UT
    Local,
}

/// A point on the continuous Julian Date time line
///
/// The wrapped value is a Julian Date in days. The engine treats it as UT
/// for sidereal time and as the dynamical time argument of the orbital
/// models; the difference is far below the engine's accuracy.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Instant(f64);

impl Instant {
    /// The J2000.0 epoch (2000-01-01T12:00:00)
    pub const J2000: Instant = Instant(J2000);

    /// Create an instant from a Julian date, rejecting values outside the
    /// supported calendar range
    pub fn from_jd(jd: f64) -> Result<Self> {
        Self::validate(jd)?;
        Ok(Instant(jd))
    }

    /// Create an instant from a Modified Julian Date
    pub fn from_mjd(mjd: f64) -> Result<Self> {
        Self::from_jd(mjd + MJD_OFFSET)
    }

    /// Create an instant from a UTC datetime
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let seconds = dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 * 1e-9;
        Instant(UNIX_EPOCH_JD + seconds / DAY_S)
    }

    fn validate(jd: f64) -> Result<()> {
        if !jd.is_finite() {
            return Err(TimeError::NonFinite(jd));
        }
        if !(GREGORIAN_START_JD..CALENDAR_END_JD).contains(&jd) {
            return Err(TimeError::OutOfRange(jd));
        }
        Ok(())
    }

    /// Re-check the calendar range, e.g. after arithmetic moved the instant
    pub fn checked(self) -> Result<Self> {
        Self::validate(self.0)?;
        Ok(self)
    }

    /// Julian date in days
    pub fn jd(&self) -> f64 {
        self.0
    }

    /// Modified Julian Date in days
    pub fn mjd(&self) -> f64 {
        self.0 - MJD_OFFSET
    }

    /// Days elapsed since J2000.0
    pub fn days_since_j2000(&self) -> f64 {
        self.0 - J2000
    }

    /// Julian centuries elapsed since J2000.0
    pub fn centuries_since_j2000(&self) -> f64 {
        (self.0 - J2000) / JULIAN_CENTURY
    }

    /// Convert back to a UTC datetime
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        self.checked()?;
        let micros = ((self.0 - UNIX_EPOCH_JD) * DAY_S * 1e6).round() as i64;
        DateTime::<Utc>::from_timestamp_micros(micros).ok_or(TimeError::OutOfRange(self.0))
    }
}

/// Get the current real-world instant
pub fn now(mode: TimezoneMode) -> Instant {
    match mode {
        TimezoneMode::Utc => Instant::from_datetime(Utc::now()),
        TimezoneMode::Local => Instant::from_datetime(Local::now().naive_local().and_utc()),
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match to_calendar(*self) {
            Ok(cal) => write!(
                f,
                "{:04}-{:02}-{:02} {:02}:{:02}:{:06.3} (JD {:.6})",
                cal.year, cal.month, cal.day, cal.hour, cal.minute, cal.second, self.0
            ),
            Err(_) => write!(f, "<Instant jd={:.6}>", self.0),
        }
    }
}

// Addition and subtraction in days

impl Add<f64> for Instant {
    type Output = Instant;

    fn add(self, days: f64) -> Self::Output {
        Instant(self.0 + days)
    }
}

impl AddAssign<f64> for Instant {
    fn add_assign(&mut self, days: f64) {
        self.0 += days;
    }
}

impl Sub<f64> for Instant {
    type Output = Instant;

    fn sub(self, days: f64) -> Self::Output {
        Instant(self.0 - days)
    }
}

impl Sub<Instant> for Instant {
    type Output = f64;

    fn sub(self, other: Instant) -> Self::Output {
        self.0 - other.0
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl TryFrom<f64> for Instant {
    type Error = TimeError;

    fn try_from(jd: f64) -> Result<Self> {
        Self::from_jd(jd)
    }
}

impl From<Instant> for f64 {
    fn from(instant: Instant) -> Self {
        instant.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_validates_range() {
        let instant: Instant = serde_json::from_str("2451545.0").unwrap();
        assert_eq!(instant, Instant::J2000);
        assert_eq!(serde_json::to_string(&instant).unwrap(), "2451545.0");

        // Before the Gregorian reform and after year 9999
        assert!(serde_json::from_str::<Instant>("2000000.0").is_err());
        assert!(serde_json::from_str::<Instant>("1e9").is_err());
    }

    #[test]
    fn test_j2000_from_datetime() {
        let date = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let instant = Instant::from_datetime(date);
        assert_relative_eq!(instant.jd(), J2000, epsilon = 1e-9);
        assert_relative_eq!(instant.days_since_j2000(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_datetime_roundtrip() {
        let date = Utc.with_ymd_and_hms(2018, 1, 18, 6, 30, 15).unwrap();
        let instant: Instant = date.into();
        let back = instant.to_datetime().unwrap();
        // f64 Julian dates resolve to a few tens of microseconds
        assert!((back - date).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn test_rejects_pre_gregorian_dates() {
        assert_eq!(
            Instant::from_jd(2_000_000.0),
            Err(TimeError::OutOfRange(2_000_000.0))
        );
        assert!(Instant::from_jd(GREGORIAN_START_JD).is_ok());
    }

    #[test]
    fn test_rejects_dates_past_year_9999() {
        assert_eq!(Instant::from_jd(1.0e9), Err(TimeError::OutOfRange(1.0e9)));
        assert!(Instant::from_jd(CALENDAR_END_JD).is_err());
        assert!(Instant::from_jd(CALENDAR_END_JD - 1e-3).is_ok());
        assert!((Instant::J2000 + 1.0e9).checked().is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            Instant::from_jd(f64::NAN),
            Err(TimeError::NonFinite(_))
        ));
        assert!(matches!(
            Instant::from_jd(f64::INFINITY),
            Err(TimeError::NonFinite(_))
        ));
    }

    #[test]
    fn test_arithmetic_then_checked() {
        let t = Instant::J2000;
        let later = t + 1.5;
        assert_relative_eq!(later - t, 1.5, epsilon = 1e-12);

        let scrubbed = t - 200_000.0;
        assert!(scrubbed.checked().is_err());
    }

    #[test]
    fn test_mjd() {
        let t = Instant::from_mjd(51544.5).unwrap();
        assert_relative_eq!(t.jd(), J2000, epsilon = 1e-12);
        assert_relative_eq!(t.mjd(), 51544.5, epsilon = 1e-12);
    }

    #[test]
    fn test_now_is_recent() {
        let t = now(TimezoneMode::Utc);
        // Later than 2024-01-01
        assert!(t.jd() > 2_460_310.5);
        let local = now(TimezoneMode::Local);
        assert!((local - t).abs() < 1.0);
    }
}
