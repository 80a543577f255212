//! Planetary and lunar position models

pub mod elements;
pub mod kepler;
pub mod moon;

pub use elements::{heliocentric_position, OrbitalElements};
pub use kepler::{solve_kepler, KeplerError, KeplerSolver};
pub use moon::{LunarState, Luna, PHASE_COUNT};

use thiserror::Error;

/// Error type for planetary calculations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanetError {
    #[error("No orbital elements for {}", .0.name())]
    NoElements(Body),

    #[error(transparent)]
    Kepler(#[from] KeplerError),
}

/// Enum representing the major solar system bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    /// Every body the engine tracks, in drawing order
    pub const ALL: [Body; 11] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Moon,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Bodies modelled by heliocentric Keplerian elements
    pub const PLANETS: [Body; 9] = [
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Get the body's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    /// Look up a body by case-insensitive name
    pub fn from_name(name: &str) -> Option<Body> {
        Body::ALL
            .into_iter()
            .find(|body| body.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
