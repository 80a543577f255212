//! Lunar position and phase
//!
//! Mean elements with the principal periodic terms (Paul Schlyter,
//! "Computing planetary positions"). Longitude is good to a few arcminutes
//! and distance to a few Earth radii, which is plenty for drawing the Moon
//! and tracking its phase. Schlyter's elements are referred to the equinox
//! of date; longitudes are precessed back to J2000 so the Moon shares the
//! planets' frame.

use super::kepler::solve_kepler;
use super::PlanetError;
use crate::constants::{AU_KM, EARTH_RADIUS_KM, SYNODIC_MONTH};
use crate::coordinates::{Angle, GeoEcliptic};
use crate::time::Instant;

/// Day zero of the element epoch: 1999-12-31 0h
const EPOCH_JD: f64 = 2_451_543.5;

/// General precession in longitude, degrees per day
const PRECESSION_PER_DAY: f64 = 3.823_94e-5;

/// Number of discrete phase states
pub const PHASE_COUNT: u8 = 8;

/// Geocentric state of the Moon at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarState {
    /// Geocentric ecliptic position in AU (J2000 frame)
    pub position: GeoEcliptic,
    /// Ecliptic longitude, J2000
    pub longitude: Angle,
    /// Ecliptic latitude
    pub latitude: Angle,
    /// Distance in Earth radii
    pub distance_earth_radii: f64,
    /// Moon longitude minus Sun longitude, [0°, 360°)
    pub elongation: Angle,
}

impl LunarState {
    /// Days since the last new Moon
    pub fn age(&self) -> f64 {
        self.elongation.to_degrees() / 360.0 * SYNODIC_MONTH
    }

    /// Phase bucket 0..=7: 0 new, 2 first quarter, 4 full, 6 last quarter
    pub fn phase_index(&self) -> u8 {
        let bucket = (self.age() / SYNODIC_MONTH * PHASE_COUNT as f64).floor();
        bucket.clamp(0.0, (PHASE_COUNT - 1) as f64) as u8
    }

    /// Illuminated fraction of the disc, 0 at new Moon, 1 at full
    pub fn illuminated_fraction(&self) -> f64 {
        (1.0 - self.elongation.cos()) / 2.0
    }
}

/// Moon position and phase model
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Luna;

impl Luna {
    pub fn new() -> Self {
        Luna
    }

    /// Evaluate the lunar state at an instant
    pub fn state(&self, instant: Instant) -> Result<LunarState, PlanetError> {
        let d = instant.jd() - EPOCH_JD;

        // Moon mean elements
        let node = 125.1228 - 0.052_953_808_3 * d;
        let incl: f64 = 5.1454;
        let perigee = 318.0634 + 0.164_357_322_3 * d;
        let a = 60.2666;
        let e = 0.054_900;
        let m_moon = 115.3654 + 13.064_992_950_9 * d;

        // Sun mean elements
        let w_sun = 282.9404 + 4.709_35e-5 * d;
        let e_sun = 0.016_709 - 1.151e-9 * d;
        let m_sun = 356.0470 + 0.985_600_258_5 * d;

        let (lon_moon, lat_moon, r_moon) = {
            let mean = Angle::from_degrees(m_moon).normalized_signed().to_radians();
            let ecc = solve_kepler(mean, e)?;
            let xv = a * (ecc.cos() - e);
            let yv = a * (1.0 - e * e).sqrt() * ecc.sin();
            let v = yv.atan2(xv).to_degrees();
            let r = xv.hypot(yv);

            let (sn, cn) = node.to_radians().sin_cos();
            let (su, cu) = (v + perigee).to_radians().sin_cos();
            let (si, ci) = incl.to_radians().sin_cos();
            let xh = r * (cn * cu - sn * su * ci);
            let yh = r * (sn * cu + cn * su * ci);
            let zh = r * su * si;
            (
                yh.atan2(xh).to_degrees(),
                zh.atan2(xh.hypot(yh)).to_degrees(),
                r,
            )
        };

        let lon_sun = {
            let mean = Angle::from_degrees(m_sun).normalized_signed().to_radians();
            let ecc = solve_kepler(mean, e_sun)?;
            let xv = ecc.cos() - e_sun;
            let yv = (1.0 - e_sun * e_sun).sqrt() * ecc.sin();
            yv.atan2(xv).to_degrees() + w_sun
        };

        // Fundamental arguments, radians
        let mean_lon_moon = m_moon + perigee + node;
        let mean_lon_sun = m_sun + w_sun;
        let mm = m_moon.to_radians();
        let ms = m_sun.to_radians();
        let dd = (mean_lon_moon - mean_lon_sun).to_radians();
        let ff = (mean_lon_moon - node).to_radians();

        let d_lon = -1.274 * (mm - 2.0 * dd).sin()
            + 0.658 * (2.0 * dd).sin()
            - 0.186 * ms.sin()
            - 0.059 * (2.0 * mm - 2.0 * dd).sin()
            - 0.057 * (mm - 2.0 * dd + ms).sin()
            + 0.053 * (mm + 2.0 * dd).sin()
            + 0.046 * (2.0 * dd - ms).sin()
            + 0.041 * (mm - ms).sin()
            - 0.035 * dd.sin()
            - 0.031 * (mm + ms).sin()
            - 0.015 * (2.0 * ff - 2.0 * dd).sin()
            + 0.011 * (mm - 4.0 * dd).sin();

        let d_lat = -0.173 * (ff - 2.0 * dd).sin()
            - 0.055 * (mm - ff - 2.0 * dd).sin()
            - 0.046 * (mm + ff - 2.0 * dd).sin()
            + 0.033 * (ff + 2.0 * dd).sin()
            + 0.017 * (2.0 * mm + ff).sin();

        let d_r = -0.58 * (mm - 2.0 * dd).cos() - 0.46 * (2.0 * dd).cos();

        let to_j2000 = -PRECESSION_PER_DAY * d;
        let longitude = Angle::from_degrees(lon_moon + d_lon + to_j2000).normalized();
        let latitude = Angle::from_degrees(lat_moon + d_lat);
        let distance_earth_radii = r_moon + d_r;
        let sun_longitude = Angle::from_degrees(lon_sun + to_j2000).normalized();

        let elongation = Angle::from_degrees(longitude.to_degrees() - sun_longitude.to_degrees())
            .normalized();

        Ok(LunarState {
            position: GeoEcliptic::from_spherical(
                longitude,
                latitude,
                distance_earth_radii * EARTH_RADIUS_KM / AU_KM,
            ),
            longitude,
            latitude,
            distance_earth_radii,
            elongation,
        })
    }

    /// Geocentric ecliptic position in AU
    pub fn position(&self, instant: Instant) -> Result<GeoEcliptic, PlanetError> {
        Ok(self.state(instant)?.position)
    }

    /// Days since the last new Moon
    pub fn age(&self, instant: Instant) -> Result<f64, PlanetError> {
        Ok(self.state(instant)?.age())
    }
}
