//! The shared time and place context
//!
//! An [`Observer`] is created once from an externally resolved location and
//! then has its instant advanced every step. Obliquity and sidereal time are
//! computed on each read, so nothing derived from a previous instant can be
//! observed after [`Observer::set_instant`].

use crate::coordinates::Angle;
use crate::time::{greenwich_sidereal_time, local_sidereal_time, Instant};
use thiserror::Error;

/// Error type for observer construction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObserverError {
    #[error("Longitude {0} is outside [-180, 180] degrees")]
    InvalidLongitude(f64),

    #[error("Latitude {0} is outside [-90, 90] degrees")]
    InvalidLatitude(f64),
}

/// Geographic location and current instant
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    instant: Instant,
    longitude: f64,
    latitude: f64,
}

impl Observer {
    /// Create an observer at an east-positive longitude and latitude, in degrees
    pub fn new(longitude: f64, latitude: f64, instant: Instant) -> Result<Self, ObserverError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ObserverError::InvalidLongitude(longitude));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ObserverError::InvalidLatitude(latitude));
        }
        Ok(Self {
            instant,
            longitude,
            latitude,
        })
    }

    pub fn set_instant(&mut self, instant: Instant) {
        self.instant = instant;
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }

    /// East-positive longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Geodetic latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Mean obliquity of the ecliptic
    pub fn obliquity(&self) -> Angle {
        mean_obliquity(self.instant)
    }

    /// Greenwich mean sidereal time
    pub fn greenwich_sidereal_time(&self) -> Angle {
        greenwich_sidereal_time(self.instant)
    }

    /// Local mean sidereal time at the observer's longitude
    pub fn local_sidereal_time(&self) -> Angle {
        local_sidereal_time(self.instant, self.longitude)
    }
}

/// Mean obliquity of the ecliptic (Meeus 22.2, cubic in Julian centuries)
pub fn mean_obliquity(instant: Instant) -> Angle {
    let t = instant.centuries_since_j2000();
    let arcsec = 21.448 - 46.815_0 * t - 0.000_59 * t * t + 0.001_813 * t * t * t;
    Angle::from_degrees(23.0 + 26.0 / 60.0 + arcsec / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_obliquity_at_j2000() {
        let obs = Observer::new(0.0, 51.5, Instant::J2000).unwrap();
        assert_abs_diff_eq!(obs.obliquity().to_degrees(), 23.439_291, epsilon = 1e-6);
    }

    #[test]
    fn test_obliquity_tracks_instant() {
        let mut obs = Observer::new(0.0, 51.5, Instant::J2000).unwrap();
        let before = obs.obliquity().to_degrees();
        obs.set_instant(Instant::J2000 + 36_525.0);
        let after = obs.obliquity().to_degrees();
        // About 47 arcseconds per century, decreasing
        assert!(after < before);
        assert_abs_diff_eq!(before - after, 46.815 / 3600.0, epsilon = 1e-3);
    }

    #[test]
    fn test_obliquity_monotonic_over_millennia() {
        let mut previous = f64::INFINITY;
        for century in -4..=10 {
            let instant = Instant::J2000 + century as f64 * 36_525.0;
            let eps = mean_obliquity(instant).to_degrees();
            assert!(eps < previous);
            previous = eps;
        }
    }

    #[test]
    fn test_sidereal_time_follows_set_instant() {
        let mut obs = Observer::new(-77.0655, 38.9, Instant::from_jd(2_446_895.5).unwrap()).unwrap();
        let lst_a = obs.local_sidereal_time().to_degrees();
        assert_abs_diff_eq!(lst_a, 197.693_195 - 77.0655, epsilon = 0.01);

        obs.set_instant(Instant::from_jd(2_446_896.306_25).unwrap());
        let gmst_b = obs.greenwich_sidereal_time().to_degrees();
        assert_abs_diff_eq!(gmst_b, 128.737_873_4, epsilon = 0.01);
    }

    #[test]
    fn test_invalid_location() {
        assert_eq!(
            Observer::new(200.0, 0.0, Instant::J2000),
            Err(ObserverError::InvalidLongitude(200.0))
        );
        assert_eq!(
            Observer::new(0.0, -91.0, Instant::J2000),
            Err(ObserverError::InvalidLatitude(-91.0))
        );
    }
}
