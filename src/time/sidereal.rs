//! Mean sidereal time
//!
//! Greenwich mean sidereal time from the IAU 1982 expression in the form
//! given by Meeus, Astronomical Algorithms (12.4). The polynomial is
//! continuous in the Julian date, so there is no jump at 0h UT.

use super::Instant;
use crate::constants::J2000;
use crate::coordinates::angle::Angle;

/// Greenwich mean sidereal time, wrapped to [0°, 360°)
pub fn greenwich_sidereal_time(instant: Instant) -> Angle {
    let d = instant.jd() - J2000;
    let t = instant.centuries_since_j2000();

    let theta = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;

    Angle::from_degrees(theta).normalized()
}

/// Local mean sidereal time for an east-positive longitude in degrees
pub fn local_sidereal_time(instant: Instant, longitude_deg: f64) -> Angle {
    let gmst = greenwich_sidereal_time(instant).to_degrees();
    Angle::from_degrees(gmst + longitude_deg).normalized()
}
