//! Pure frame and origin conversions
//!
//! None of these functions keep state; the [`Observer`] supplies obliquity,
//! sidereal time and latitude for the instant being computed.

use crate::coordinates::{
    Angle, Ecliptic, Equatorial, GeoEcliptic, GeoEquatorial, GeoHorizontal, HelioEcliptic, Origin,
    Position,
};
use crate::observer::Observer;
use nalgebra::{Matrix3, Rotation3, Vector3};

/// Rotation taking ecliptic components to equatorial components
///
/// The equatorial plane is the ecliptic plane tilted by `-ε` about the
/// shared X axis (the equinox line), so vector components turn by `+ε`.
pub fn ecliptic_to_equatorial_matrix(obliquity: Angle) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), obliquity.to_radians())
}

/// Convert an ecliptic position to the equatorial frame, keeping its origin
pub fn ecliptic_to_equatorial<O: Origin>(
    observer: &Observer,
    position: &Position<O, Ecliptic>,
) -> Position<O, Equatorial> {
    let rotation = ecliptic_to_equatorial_matrix(observer.obliquity());
    Position::from_vector(rotation * position.vector())
}

/// Convert an equatorial position back to the ecliptic frame
pub fn equatorial_to_ecliptic<O: Origin>(
    observer: &Observer,
    position: &Position<O, Equatorial>,
) -> Position<O, Ecliptic> {
    let rotation = ecliptic_to_equatorial_matrix(observer.obliquity());
    Position::from_vector(rotation.inverse() * position.vector())
}

/// Rotation taking equatorial components to horizontal (east, north, up)
/// components for the observer's sidereal time and latitude
pub fn equatorial_to_horizontal_matrix(observer: &Observer) -> Matrix3<f64> {
    let lst = observer.local_sidereal_time().to_radians();
    let lat = Angle::from_degrees(observer.latitude());
    let (sin_lat, cos_lat) = (lat.sin(), lat.cos());

    // Hour-angle frame: X toward the local meridian on the equator
    let to_meridian = Rotation3::from_axis_angle(&Vector3::z_axis(), -lst);

    // Tilt the pole down to the zenith by the colatitude
    #[rustfmt::skip]
    let to_horizon = Matrix3::new(
        0.0,      1.0, 0.0,
        -sin_lat, 0.0, cos_lat,
        cos_lat,  0.0, sin_lat,
    );

    to_horizon * to_meridian.matrix()
}

/// Convert a geocentric equatorial position to the observer's horizon frame
pub fn equatorial_to_horizontal(observer: &Observer, position: &GeoEquatorial) -> GeoHorizontal {
    GeoHorizontal::from_vector(equatorial_to_horizontal_matrix(observer) * position.vector())
}

/// Convert a horizon-frame position back to geocentric equatorial
pub fn horizontal_to_equatorial(observer: &Observer, position: &GeoHorizontal) -> GeoEquatorial {
    let m = equatorial_to_horizontal_matrix(observer);
    GeoEquatorial::from_vector(m.transpose() * position.vector())
}

/// Shift a heliocentric ecliptic position to the Earth's centre
pub fn heliocentric_to_geocentric(position: &HelioEcliptic, earth: &HelioEcliptic) -> GeoEcliptic {
    GeoEcliptic::from_vector(position.vector() - earth.vector())
}

/// Shift a geocentric ecliptic position to the Sun's centre
pub fn geocentric_to_heliocentric(position: &GeoEcliptic, earth: &HelioEcliptic) -> HelioEcliptic {
    HelioEcliptic::from_vector(position.vector() + earth.vector())
}

/// The Sun in the heliocentric frame: the origin
pub fn sun_heliocentric() -> HelioEcliptic {
    HelioEcliptic::zero()
}

/// The Sun seen from the Earth: the negated heliocentric Earth vector
pub fn sun_geocentric(earth: &HelioEcliptic) -> GeoEcliptic {
    heliocentric_to_geocentric(&sun_heliocentric(), earth)
}

/// Equatorial reference directions expressed as ecliptic unit vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAxes {
    /// North celestial pole
    pub north_pole: Vector3<f64>,
    /// Vernal equinox, shared by both frames
    pub vernal_equinox: Vector3<f64>,
    /// June solstice point (RA 6h on the celestial equator)
    pub june_solstice: Vector3<f64>,
    /// Rotation of the Earth about its pole (Greenwich sidereal time)
    pub earth_rotation: Angle,
    /// Tilt of the equatorial frame relative to the ecliptic
    pub obliquity: Angle,
}

impl FrameAxes {
    pub fn for_observer(observer: &Observer) -> Self {
        let to_ecliptic = ecliptic_to_equatorial_matrix(observer.obliquity()).inverse();
        FrameAxes {
            north_pole: to_ecliptic * Vector3::z(),
            vernal_equinox: to_ecliptic * Vector3::x(),
            june_solstice: to_ecliptic * Vector3::y(),
            earth_rotation: observer.greenwich_sidereal_time(),
            obliquity: observer.obliquity(),
        }
    }
}
