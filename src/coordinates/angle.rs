//! # Angle Representation Module
//!
//! Angles returned by the engine (obliquity, sidereal time, altitude,
//! azimuth) keep the unit they were computed in. Formulas quoted in degrees
//! stay in degrees until a trigonometric function needs radians, which avoids
//! a conversion round trip on every read.
//!
//! ```rust
//! use solarium::coordinates::angle::Angle;
//!
//! let gmst = Angle::from_degrees(370.0).normalized();
//! assert!((gmst.to_degrees() - 10.0).abs() < 1e-12);
//! ```

use std::f64::consts::PI;
use std::fmt;

/// Internal representation format for angle values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleFormat {
    /// Angle stored in degrees
    Degrees(f64),
    /// Angle stored in radians
    Radians(f64),
}

/// An angular measurement stored in its original unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    angle: AngleFormat,
}

impl Angle {
    pub fn from_degrees(degrees: f64) -> Self {
        Angle {
            angle: AngleFormat::Degrees(degrees),
        }
    }

    pub fn from_radians(radians: f64) -> Self {
        Angle {
            angle: AngleFormat::Radians(radians),
        }
    }

    /// Create an angle from hours of time (15° per hour)
    pub fn from_hours(hours: f64) -> Self {
        Self::from_degrees(hours * 15.0)
    }

    pub fn to_degrees(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg,
            AngleFormat::Radians(rad) => rad * (180.0 / PI),
        }
    }

    pub fn to_radians(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg * (PI / 180.0),
            AngleFormat::Radians(rad) => rad,
        }
    }

    /// Angle expressed in hours of time
    pub fn to_hours(&self) -> f64 {
        self.to_degrees() / 15.0
    }

    pub fn format(&self) -> AngleFormat {
        self.angle
    }

    /// Wrap into one full turn, [0°, 360°) or [0, 2π), keeping the unit
    pub fn normalized(&self) -> Self {
        match self.angle {
            AngleFormat::Degrees(deg) => Self::from_degrees(wrap(deg, 360.0)),
            AngleFormat::Radians(rad) => Self::from_radians(wrap(rad, 2.0 * PI)),
        }
    }

    /// Wrap into (-180°, 180°] or (-π, π], keeping the unit
    pub fn normalized_signed(&self) -> Self {
        let (value, turn) = match self.angle {
            AngleFormat::Degrees(deg) => (deg, 360.0),
            AngleFormat::Radians(rad) => (rad, 2.0 * PI),
        };
        let mut wrapped = wrap(value, turn);
        if wrapped > turn / 2.0 {
            wrapped -= turn;
        }
        match self.angle {
            AngleFormat::Degrees(_) => Self::from_degrees(wrapped),
            AngleFormat::Radians(_) => Self::from_radians(wrapped),
        }
    }

    pub fn sin(&self) -> f64 {
        self.to_radians().sin()
    }

    pub fn cos(&self) -> f64 {
        self.to_radians().cos()
    }
}

// rem_euclid can return `turn` itself for tiny negative inputs
fn wrap(value: f64, turn: f64) -> f64 {
    let wrapped = value.rem_euclid(turn);
    if wrapped >= turn {
        0.0
    } else {
        wrapped
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°", self.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_keeps_original_unit() {
        let angle = Angle::from_degrees(45.0);
        match angle.format() {
            AngleFormat::Degrees(val) => assert_eq!(val, 45.0),
            AngleFormat::Radians(_) => panic!("Expected degrees format"),
        }
        assert_relative_eq!(angle.to_radians(), PI / 4.0, epsilon = 1e-15);
    }

    #[test]
    fn test_hours() {
        let angle = Angle::from_hours(13.0);
        assert_eq!(angle.to_degrees(), 195.0);
        assert_relative_eq!(Angle::from_radians(PI).to_hours(), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalized() {
        assert_relative_eq!(Angle::from_degrees(-10.0).normalized().to_degrees(), 350.0);
        assert_relative_eq!(Angle::from_degrees(725.0).normalized().to_degrees(), 5.0);
        assert_relative_eq!(
            Angle::from_radians(-PI / 2.0).normalized().to_radians(),
            1.5 * PI,
            epsilon = 1e-12
        );
        let tiny = Angle::from_degrees(-1e-18).normalized().to_degrees();
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_normalized_signed() {
        assert_relative_eq!(
            Angle::from_degrees(350.0).normalized_signed().to_degrees(),
            -10.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            Angle::from_degrees(180.0).normalized_signed().to_degrees(),
            180.0
        );
    }
}
