//! Solarium: per-frame solar system engine
//!
//! This crate computes, for a sequence of instants, the positions of the
//! Sun, the planets, the Moon and Earth satellites in heliocentric,
//! geocentric, equatorial and horizontal frames, together with the
//! calendar and astronomical events a visualization annotates.
//!
//! The entry point is [`engine::Solarium`], configured by
//! [`config::EngineConfig`] and stepped once per frame.

use thiserror::Error;

pub mod almanac;
pub mod celestial;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod engine;
pub mod framelib;
pub mod observer;
pub mod planetlib;
pub mod sgp;
pub mod time;

// Re-export commonly used types
pub use almanac::{EventAnnotation, EventDetector, EventKind};
pub use celestial::CelestialObject;
pub use config::EngineConfig;
pub use engine::{Clock, Frame, Solarium};
pub use observer::Observer;
pub use planetlib::Body;
pub use time::Instant;

/// Main error type for the solarium library
#[derive(Debug, Error)]
pub enum SolariumError {
    #[error("Time error: {0}")]
    Time(#[from] time::TimeError),

    #[error("Observer error: {0}")]
    Observer(#[from] observer::ObserverError),

    #[error("Planet error: {0}")]
    Planet(#[from] planetlib::PlanetError),

    #[error("Kepler error: {0}")]
    Kepler(#[from] planetlib::KeplerError),

    #[error("TLE error: {0}")]
    Tle(#[from] sgp::TleError),

    #[error("Satellite error: {0}")]
    Satellite(#[from] sgp::SatelliteError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type for solarium operations
pub type Result<T> = std::result::Result<T, SolariumError>;
