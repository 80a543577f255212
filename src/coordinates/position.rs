//! # Frame-tagged positions
//!
//! A [`Position`] is a Cartesian vector in astronomical units that carries
//! its origin and reference frame in its type. Every transform in
//! [`crate::framelib`] takes one specific combination and returns another,
//! so feeding a heliocentric vector into a geocentric-only transform, or an
//! ecliptic vector into an equatorial one, is a compile error rather than a
//! silently wrong picture.
//!
//! ## Axis conventions
//!
//! - Ecliptic: X toward the vernal equinox, Z toward the north ecliptic pole
//! - Equatorial: X toward the vernal equinox, Z toward the north celestial pole
//! - Horizontal: X toward the east point, Y toward north, Z toward the zenith
//!
//! ```rust
//! use solarium::coordinates::{HelioEcliptic, GeoEcliptic};
//!
//! let earth = HelioEcliptic::new(-0.17, 0.97, 0.0);
//! assert!((earth.distance() - 0.9848).abs() < 1e-3);
//! // GeoEcliptic::from(earth) does not exist: origins never convert implicitly.
//! let _moon = GeoEcliptic::new(0.0024, 0.0, 0.0);
//! ```

use super::angle::Angle;
use crate::constants::AU_KM;
use nalgebra::Vector3;
use std::fmt;
use std::marker::PhantomData;

/// Origin of a position vector
pub trait Origin: Copy + fmt::Debug {
    const NAME: &'static str;
}

/// Reference frame of a position vector
pub trait Frame: Copy + fmt::Debug {
    const NAME: &'static str;
}

/// Origin at the centre of the Sun
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heliocentric;

/// Origin at the centre of the Earth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geocentric;

/// Fundamental plane is the ecliptic (Earth's orbital plane, J2000)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ecliptic;

/// Fundamental plane is the Earth's equator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equatorial;

/// Fundamental plane is the observer's horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizontal;

impl Origin for Heliocentric {
    const NAME: &'static str = "heliocentric";
}

impl Origin for Geocentric {
    const NAME: &'static str = "geocentric";
}

impl Frame for Ecliptic {
    const NAME: &'static str = "ecliptic";
}

impl Frame for Equatorial {
    const NAME: &'static str = "equatorial";
}

impl Frame for Horizontal {
    const NAME: &'static str = "horizontal";
}

/// Cartesian position in AU tagged with its origin and frame
#[derive(Clone, Copy, PartialEq)]
pub struct Position<O: Origin, F: Frame> {
    vector: Vector3<f64>,
    _tag: PhantomData<(O, F)>,
}

/// Sun-centred ecliptic position, the native output of the planet models
pub type HelioEcliptic = Position<Heliocentric, Ecliptic>;
/// Earth-centred ecliptic position
pub type GeoEcliptic = Position<Geocentric, Ecliptic>;
/// Earth-centred equatorial position
pub type GeoEquatorial = Position<Geocentric, Equatorial>;
/// Observer horizon position (geocentric, parallax ignored)
pub type GeoHorizontal = Position<Geocentric, Horizontal>;

impl<O: Origin, F: Frame> Position<O, F> {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_vector(Vector3::new(x, y, z))
    }

    pub fn from_vector(vector: Vector3<f64>) -> Self {
        Position {
            vector,
            _tag: PhantomData,
        }
    }

    /// Create a position from kilometres
    pub fn from_km(vector_km: Vector3<f64>) -> Self {
        Self::from_vector(vector_km / AU_KM)
    }

    /// Create a position from spherical coordinates in the same frame
    pub fn from_spherical(longitude: Angle, latitude: Angle, distance: f64) -> Self {
        let cos_lat = latitude.cos();
        Self::new(
            distance * cos_lat * longitude.cos(),
            distance * cos_lat * longitude.sin(),
            distance * latitude.sin(),
        )
    }

    pub fn zero() -> Self {
        Self::from_vector(Vector3::zeros())
    }

    pub fn x(&self) -> f64 {
        self.vector.x
    }

    pub fn y(&self) -> f64 {
        self.vector.y
    }

    pub fn z(&self) -> f64 {
        self.vector.z
    }

    /// Underlying vector in AU
    pub fn vector(&self) -> Vector3<f64> {
        self.vector
    }

    /// Underlying vector in kilometres
    pub fn to_km(&self) -> Vector3<f64> {
        self.vector * AU_KM
    }

    /// Distance from the origin in AU
    pub fn distance(&self) -> f64 {
        self.vector.norm()
    }

    /// Unit direction, `None` at the origin
    pub fn direction(&self) -> Option<Vector3<f64>> {
        self.vector.try_normalize(f64::MIN_POSITIVE)
    }

    /// Longitude/right-ascension-like angle in [0°, 360°), latitude-like
    /// angle, and distance
    pub fn to_spherical(&self) -> (Angle, Angle, f64) {
        let distance = self.distance();
        if distance == 0.0 {
            return (Angle::from_radians(0.0), Angle::from_radians(0.0), 0.0);
        }
        let lon = Angle::from_radians(self.vector.y.atan2(self.vector.x)).normalized();
        let lat = Angle::from_radians((self.vector.z / distance).clamp(-1.0, 1.0).asin());
        (lon, lat, distance)
    }

    /// Whether every component is finite
    pub fn is_finite(&self) -> bool {
        self.vector.iter().all(|c| c.is_finite())
    }

    /// Component-wise difference between two positions of the same kind
    pub fn offset_to(&self, other: &Self) -> Vector3<f64> {
        other.vector - self.vector
    }
}

impl<O: Origin, F: Frame> fmt::Debug for Position<O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position<{}, {}>({:.9}, {:.9}, {:.9})",
            O::NAME,
            F::NAME,
            self.vector.x,
            self.vector.y,
            self.vector.z
        )
    }
}

impl<O: Origin, F: Frame> fmt::Display for Position<O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:>12.6}, {:>12.6}, {:>12.6}) AU",
            self.vector.x, self.vector.y, self.vector.z
        )
    }
}

/// Altitude/azimuth of a horizontal position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltAz {
    /// Angle above the horizon, [-90°, 90°]
    pub altitude: Angle,
    /// Angle from north through east, [0°, 360°)
    pub azimuth: Angle,
    /// Distance in AU
    pub distance: f64,
}

impl AltAz {
    pub fn is_above_horizon(&self) -> bool {
        self.altitude.to_radians() > 0.0
    }
}

impl GeoHorizontal {
    /// Altitude and azimuth (north = 0°, east = 90°)
    pub fn alt_az(&self) -> AltAz {
        let distance = self.distance();
        if distance == 0.0 {
            return AltAz {
                altitude: Angle::from_radians(0.0),
                azimuth: Angle::from_radians(0.0),
                distance,
            };
        }
        let altitude = (self.z() / distance).clamp(-1.0, 1.0).asin();
        let azimuth = self.x().atan2(self.y());
        AltAz {
            altitude: Angle::from_radians(altitude),
            azimuth: Angle::from_radians(azimuth).normalized(),
            distance,
        }
    }

    /// Build a horizontal position from altitude, azimuth and distance
    pub fn from_alt_az(altitude: Angle, azimuth: Angle, distance: f64) -> Self {
        let cos_alt = altitude.cos();
        Self::new(
            distance * cos_alt * azimuth.sin(),
            distance * cos_alt * azimuth.cos(),
            distance * altitude.sin(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spherical_roundtrip() {
        let p = HelioEcliptic::from_spherical(Angle::from_degrees(250.0), Angle::from_degrees(-3.0), 1.5);
        let (lon, lat, r) = p.to_spherical();
        assert_relative_eq!(lon.to_degrees(), 250.0, epsilon = 1e-9);
        assert_relative_eq!(lat.to_degrees(), -3.0, epsilon = 1e-9);
        assert_relative_eq!(r, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_km_conversion() {
        let p = GeoEquatorial::from_km(Vector3::new(AU_KM, 0.0, 0.0));
        assert_relative_eq!(p.x(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(p.to_km().x, AU_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_alt_az_cardinal_points() {
        let north = GeoHorizontal::new(0.0, 1.0, 0.0).alt_az();
        assert_relative_eq!(north.azimuth.to_degrees(), 0.0, epsilon = 1e-12);
        let east = GeoHorizontal::new(1.0, 0.0, 0.0).alt_az();
        assert_relative_eq!(east.azimuth.to_degrees(), 90.0, epsilon = 1e-12);
        let zenith = GeoHorizontal::new(0.0, 0.0, 2.0).alt_az();
        assert_relative_eq!(zenith.altitude.to_degrees(), 90.0, epsilon = 1e-12);
        assert!(zenith.is_above_horizon());
    }

    #[test]
    fn test_alt_az_roundtrip() {
        let p = GeoHorizontal::from_alt_az(Angle::from_degrees(30.0), Angle::from_degrees(200.0), 2.0);
        let aa = p.alt_az();
        assert_relative_eq!(aa.altitude.to_degrees(), 30.0, epsilon = 1e-9);
        assert_relative_eq!(aa.azimuth.to_degrees(), 200.0, epsilon = 1e-9);
        assert_relative_eq!(aa.distance, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_direction_of_origin() {
        assert!(HelioEcliptic::zero().direction().is_none());
        let d = GeoEcliptic::new(0.0, 3.0, 4.0).direction().unwrap();
        assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-15);
    }
}
