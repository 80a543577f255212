//! Earth satellites from two-line element sets
//!
//! [`Tle`] parses the NORAD text format and [`Propagator`] turns an element
//! set into geocentric equatorial positions. Output is in the TLE's own
//! true-equator mean-equinox frame, which the engine treats as equatorial
//! of date.

pub mod propagator;
pub mod tle;

pub use propagator::{Propagator, SecularRates};
pub use tle::{Tle, TleLines};

use crate::planetlib::KeplerError;
use crate::time::TimeError;
use thiserror::Error;

/// Error type for TLE parsing
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TleError {
    #[error("TLE line {line} has {length} characters, expected 69")]
    InvalidLength { line: u8, length: usize },

    #[error("TLE line {line} does not start with its line number")]
    InvalidLineNumber { line: u8 },

    #[error("TLE line {line} checksum mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch { line: u8, expected: u32, computed: u32 },

    #[error("TLE line {line}: cannot parse {field}")]
    ParseField { line: u8, field: &'static str },

    #[error("TLE catalog numbers differ: {line1} on line 1, {line2} on line 2")]
    CatalogMismatch { line1: u32, line2: u32 },

    #[error("TLE line {0} is missing")]
    MissingLine(u8),

    #[error("TLE epoch: {0}")]
    Epoch(#[from] TimeError),
}

/// Error type for satellite propagation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SatelliteError {
    #[error(transparent)]
    Kepler(#[from] KeplerError),

    #[error("{name} has decayed (perigee {perigee_km:.0} km)")]
    Decayed { name: String, perigee_km: f64 },
}
