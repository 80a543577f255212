//! Per-step output of the engine

use std::collections::BTreeMap;

use nalgebra::Vector3;

use crate::almanac::{EventAnnotation, EventKind};
use crate::coordinates::{AltAz, GeoEcliptic, GeoEquatorial, HelioEcliptic};
use crate::framelib::FrameAxes;
use crate::planetlib::{Body, LunarState};
use crate::time::{CalendarDate, Instant};

/// Formatted strings for the heads-up display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    /// `YYYY MON DD` with the configured month names
    pub date: String,
    /// `HH:MM:SS` shifted by the configured display offset
    pub time: String,
    /// `lng: X.XX  lat: Y.YY`
    pub location: String,
}

/// Every position of one body at one step
#[derive(Debug, Clone, PartialEq)]
pub struct BodySnapshot {
    pub name: String,
    pub heliocentric: HelioEcliptic,
    pub geocentric: GeoEcliptic,
    pub equatorial: GeoEquatorial,
    pub horizontal: AltAz,
    /// Position in scene units
    pub scene: Vector3<f64>,
}

impl BodySnapshot {
    pub fn above_horizon(&self) -> bool {
        self.horizontal.is_above_horizon()
    }
}

/// A satellite's state at one step
///
/// `snapshot` is `None` when propagation failed; `error` then says why.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteSnapshot {
    pub name: String,
    /// Days between the step and the TLE epoch, negative before the epoch
    pub epoch_age_days: f64,
    pub snapshot: Option<BodySnapshot>,
    /// Geocentric position in scene units, for the Earth-centred view
    pub geocentric_scene: Option<Vector3<f64>>,
    pub error: Option<String>,
}

/// Snapshot of everything the engine computed for one instant
#[derive(Debug, Clone)]
pub struct Frame {
    pub instant: Instant,
    pub calendar: CalendarDate,
    pub hud: Hud,
    pub axes: FrameAxes,
    /// Unit vector from the Sun to the Earth (ecliptic)
    pub earth_direction: Option<Vector3<f64>>,
    /// Bodies computed successfully this step; degraded bodies are absent
    pub bodies: BTreeMap<Body, BodySnapshot>,
    pub satellites: Vec<SatelliteSnapshot>,
    pub moon: Option<LunarState>,
    /// Annotations emitted during this step
    pub events: Vec<EventAnnotation>,
}

impl Frame {
    pub fn body(&self, body: Body) -> Option<&BodySnapshot> {
        self.bodies.get(&body)
    }

    pub fn satellite(&self, name: &str) -> Option<&SatelliteSnapshot> {
        self.satellites.iter().find(|s| s.name == name)
    }

    /// Bodies above the observer's horizon
    pub fn visible(&self) -> impl Iterator<Item = (&Body, &BodySnapshot)> {
        self.bodies.iter().filter(|(_, s)| s.above_horizon())
    }

    pub fn year_wrapped(&self) -> bool {
        self.events.iter().any(|e| e.kind == EventKind::YearWrap)
    }
}
