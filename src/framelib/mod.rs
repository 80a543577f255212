//! Reference frame conversions between ecliptic, equatorial and horizontal
//! coordinates, and between heliocentric and geocentric origins

pub mod transform;

pub use transform::{
    ecliptic_to_equatorial, equatorial_to_ecliptic, equatorial_to_horizontal,
    geocentric_to_heliocentric, heliocentric_to_geocentric, horizontal_to_equatorial,
    sun_geocentric, sun_heliocentric, FrameAxes,
};
