//! Constants module for astronomical calculations

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in kilometers
pub const AU_KM: f64 = 149_597_870.700;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Minutes in a day
pub const DAY_MIN: f64 = 1_440.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Julian days per Julian century
pub const JULIAN_CENTURY: f64 = 36_525.0;
/// Offset between Julian date and Modified Julian Date
pub const MJD_OFFSET: f64 = 2_400_000.5;
/// Unix epoch (1970-01-01T00:00:00Z) as Julian date
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Mean length of the synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_588_853;

// Angles
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Earth constants
/// Earth's equatorial radius in kilometers (WGS-84)
pub const EARTH_RADIUS_KM: f64 = 6_378.137;
/// Earth's gravitational parameter in km^3/s^2
pub const MU_EARTH: f64 = 398_600.4418;
/// Second zonal harmonic of Earth's gravity field
pub const J2: f64 = 1.082_626_68e-3;

// Calendar constants
/// First day of Gregorian calendar in Julian day number (1582-10-15)
pub const GREGORIAN_START: i32 = 2_299_161;
/// Midnight starting the first Gregorian calendar day, as a Julian date
pub const GREGORIAN_START_JD: f64 = GREGORIAN_START as f64 - 0.5;
/// Last calendar year the engine accepts
pub const LAST_YEAR: i32 = 9999;
/// Midnight starting 10000-01-01, the first unsupported instant
pub const CALENDAR_END_JD: f64 = 5_373_484.5;
