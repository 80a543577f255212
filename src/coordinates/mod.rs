pub mod angle;
pub mod position;

pub use angle::Angle;
pub use position::{
    AltAz, Ecliptic, Equatorial, Frame, GeoEcliptic, GeoEquatorial, GeoHorizontal, Geocentric,
    HelioEcliptic, Heliocentric, Horizontal, Origin, Position,
};
