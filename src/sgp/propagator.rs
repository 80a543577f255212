//! Simplified secular-perturbation propagator
//!
//! Keeps the mean elements of the TLE and applies only the secular J2 drift
//! of the node, perigee and mean anomaly plus the first-derivative drag term.
//! Drag raises the mean motion, which advances the mean anomaly and shrinks
//! the semi-major axis used for both the orbit and the decay check. The
//! TLE's `bstar` coefficient is not used. Periodic terms are ignored, so
//! errors grow to tens of kilometres within days of the epoch; that is fine
//! for drawing an orbit but not for pass prediction.

use super::{SatelliteError, Tle};
use crate::constants::{DAY_MIN, EARTH_RADIUS_KM, J2, MU_EARTH, TAU};
use crate::coordinates::{Angle, GeoEquatorial};
use crate::planetlib::kepler::{orbit_to_reference, orbital_plane_position, KeplerSolver};
use crate::time::Instant;
use nalgebra::Vector3;

/// Secular drift rates, degrees per day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecularRates {
    pub raan: f64,
    pub argument_of_perigee: f64,
    /// Mean anomaly correction on top of the mean motion
    pub mean_anomaly: f64,
}

/// Element set prepared for repeated propagation
#[derive(Debug, Clone)]
pub struct Propagator {
    tle: Tle,
    solver: KeplerSolver,
    /// Mean motion, rad/min
    mean_motion: f64,
    /// Drag term on the mean anomaly, rad/min²
    mean_motion_dot: f64,
    /// Semi-major axis, km
    semi_major_axis: f64,
    /// Secular rates, rad/min
    raan_rate: f64,
    perigee_rate: f64,
    anomaly_rate: f64,
}

impl Propagator {
    pub fn new(tle: Tle) -> Self {
        Self::with_solver(tle, KeplerSolver::default())
    }

    pub fn with_solver(tle: Tle, solver: KeplerSolver) -> Self {
        let mean_motion = tle.mean_motion * TAU / DAY_MIN;
        let mean_motion_dot = tle.mean_motion_dot * TAU / (DAY_MIN * DAY_MIN);
        let semi_major_axis = semi_major_axis_km(mean_motion);

        let e2 = tle.eccentricity * tle.eccentricity;
        let p = semi_major_axis * (1.0 - e2);
        let k = mean_motion * J2 * (EARTH_RADIUS_KM / p).powi(2);
        let cos_i = Angle::from_degrees(tle.inclination).cos();

        Self {
            solver,
            mean_motion,
            mean_motion_dot,
            semi_major_axis,
            raan_rate: -1.5 * k * cos_i,
            perigee_rate: 0.75 * k * (5.0 * cos_i * cos_i - 1.0),
            anomaly_rate: 0.75 * k * (1.0 - e2).sqrt() * (3.0 * cos_i * cos_i - 1.0),
            tle,
        }
    }

    pub fn tle(&self) -> &Tle {
        &self.tle
    }

    /// Mean semi-major axis at epoch, km
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Orbital period at epoch, minutes
    pub fn period_minutes(&self) -> f64 {
        TAU / self.mean_motion
    }

    pub fn secular_rates(&self) -> SecularRates {
        let per_day = DAY_MIN.to_degrees();
        SecularRates {
            raan: self.raan_rate * per_day,
            argument_of_perigee: self.perigee_rate * per_day,
            mean_anomaly: self.anomaly_rate * per_day,
        }
    }

    /// Drag-adjusted semi-major axis at `instant`, km
    ///
    /// Zero once drag has driven the mean motion to zero or below.
    pub fn semi_major_axis_at(&self, instant: Instant) -> f64 {
        self.semi_major_axis_after(self.epoch_age_days(instant) * DAY_MIN)
    }

    fn semi_major_axis_after(&self, minutes: f64) -> f64 {
        let mean_motion_now = self.mean_motion + 2.0 * self.mean_motion_dot * minutes;
        if mean_motion_now > 0.0 {
            semi_major_axis_km(mean_motion_now)
        } else {
            0.0
        }
    }

    /// Days between the TLE epoch and `instant` (negative before the epoch)
    pub fn epoch_age_days(&self, instant: Instant) -> f64 {
        instant - self.tle.epoch
    }

    /// Geocentric equatorial position in kilometres
    pub fn propagate_km(&self, instant: Instant) -> Result<Vector3<f64>, SatelliteError> {
        let t = self.epoch_age_days(instant) * DAY_MIN;
        let tle = &self.tle;

        // Drag shrinks the orbit through the mean motion
        let semi_major_axis = self.semi_major_axis_after(t);
        let perigee_km = semi_major_axis * (1.0 - tle.eccentricity);
        if perigee_km < EARTH_RADIUS_KM {
            return Err(SatelliteError::Decayed {
                name: tle.name.clone(),
                perigee_km,
            });
        }

        let raan = tle.raan.to_radians() + self.raan_rate * t;
        let perigee = tle.argument_of_perigee.to_radians() + self.perigee_rate * t;
        let mean_anomaly = tle.mean_anomaly.to_radians()
            + (self.mean_motion + self.anomaly_rate) * t
            + self.mean_motion_dot * t * t;
        let mean_anomaly = Angle::from_radians(mean_anomaly).normalized_signed().to_radians();

        let eccentric_anomaly = self.solver.solve(mean_anomaly, tle.eccentricity)?;
        let in_plane = orbital_plane_position(semi_major_axis, tle.eccentricity, eccentric_anomaly);
        let rotation = orbit_to_reference(raan, tle.inclination.to_radians(), perigee);
        Ok(rotation * in_plane)
    }

    /// Geocentric equatorial position in AU
    pub fn propagate(&self, instant: Instant) -> Result<GeoEquatorial, SatelliteError> {
        Ok(GeoEquatorial::from_km(self.propagate_km(instant)?))
    }
}

/// Kepler's third law with the mean motion in rad/min
fn semi_major_axis_km(mean_motion: f64) -> f64 {
    let n = mean_motion / 60.0;
    (MU_EARTH / (n * n)).cbrt()
}
