//! The per-step simulation engine
//!
//! [`Solarium`] owns the observer, every body, the satellites, their trails
//! and the event detector. Each call to [`Solarium::step`] runs the same
//! fixed pipeline:
//!
//! 1. advance the observer to the new instant
//! 2. compute the Earth, then every other body against it
//! 3. derive equatorial and horizontal positions and scene positions
//! 4. run the event detector
//! 5. extend the trails and format the HUD strings
//!
//! and returns a [`Frame`] holding the results. A body whose computation
//! fails is logged and left out of that frame; the step itself only fails
//! for an unusable instant.

pub mod clock;
pub mod frame;
pub mod trail;

pub use clock::Clock;
pub use frame::{BodySnapshot, Frame, Hud, SatelliteSnapshot};
pub use trail::Trail;

use std::collections::BTreeMap;

use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::almanac::{EventDetector, EventKind, Observation};
use crate::celestial::{CelestialObject, Moon, Planet, Satellite, Sun};
use crate::config::{EngineConfig, Layers};
use crate::constants::SYNODIC_MONTH;
use crate::coordinates::{GeoEcliptic, HelioEcliptic};
use crate::framelib::{equatorial_to_horizontal, FrameAxes};
use crate::observer::Observer;
use crate::planetlib::{heliocentric_position, Body};
use crate::sgp::Tle;
use crate::time::calendar::format_date_with_names;
use crate::time::{self, format_time, to_calendar, Instant};
use crate::Result;

/// A satellite with its per-satellite engine state
#[derive(Debug, Clone)]
struct Tracked {
    satellite: Satellite,
    trail: Trail,
    geocentric_trail: Trail,
    stale_warned: bool,
}

/// The solar system engine
#[derive(Debug, Clone)]
pub struct Solarium {
    config: EngineConfig,
    observer: Observer,
    sun: Sun,
    planets: Vec<Planet>,
    moon: Moon,
    satellites: Vec<Tracked>,
    trails: BTreeMap<Body, Trail>,
    detector: EventDetector,
    clock: Clock,
    frame: Option<Frame>,
}

impl Solarium {
    /// Build an engine from a configuration
    ///
    /// Fails on an invalid configuration or a malformed TLE. `start` only
    /// initialises the observer; nothing is computed until the first step.
    pub fn new(config: EngineConfig, start: Instant) -> Result<Self> {
        config.validate()?;
        let start = start.checked()?;
        let observer = Observer::new(config.observer.longitude, config.observer.latitude, start)?;

        let planets = Body::PLANETS
            .iter()
            .map(|&body| Planet::new(body))
            .collect::<Result<Vec<_>>>()?;

        let mut satellites = Vec::with_capacity(config.satellites.len());
        for lines in &config.satellites {
            let tle = lines.parse()?;
            debug!("Loaded TLE {} (#{}) epoch {}", tle.name, tle.catalog_number, tle.epoch);
            satellites.push(Tracked::new(tle));
        }

        info!(
            "Engine at lng {:.4} lat {:.4} with {} planets and {} satellites",
            observer.longitude(),
            observer.latitude(),
            planets.len(),
            satellites.len()
        );

        let detector = EventDetector::new(config.month_names.clone(), config.detector.thresholds);
        let clock = Clock::new(config.time.step_days);

        Ok(Self {
            config,
            observer,
            sun: Sun::new(),
            planets,
            moon: Moon::new(),
            satellites,
            trails: BTreeMap::new(),
            detector,
            clock,
            frame: None,
        })
    }

    /// Track an additional satellite from the next step on
    pub fn add_satellite(&mut self, tle: Tle) {
        self.satellites.push(Tracked::new(tle));
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn layers(&self) -> &Layers {
        &self.config.layers
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The frame produced by the last successful step
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Every annotation emitted since the last year wrap
    pub fn annotations(&self) -> &[crate::almanac::EventAnnotation] {
        self.detector.annotations()
    }

    /// Heliocentric scene path of a body
    pub fn trail(&self, body: Body) -> Option<&Trail> {
        self.trails.get(&body)
    }

    /// Heliocentric and geocentric scene paths of a satellite
    pub fn satellite_trails(&self, name: &str) -> Option<(&Trail, &Trail)> {
        self.satellites
            .iter()
            .find(|t| t.satellite.name() == name)
            .map(|t| (&t.trail, &t.geocentric_trail))
    }

    pub fn clear_trails(&mut self) {
        self.trails.values_mut().for_each(Trail::clear);
        for tracked in &mut self.satellites {
            tracked.trail.clear();
            tracked.geocentric_trail.clear();
        }
    }

    /// Step the time offset forward by one step
    pub fn forward(&mut self) {
        self.clock.forward();
    }

    /// Step the time offset back by one step, dropping the trails
    pub fn rewind(&mut self) {
        self.clock.rewind();
        self.clear_trails();
    }

    /// Return to the present, dropping the trails
    pub fn reset_time(&mut self) {
        self.clock.reset();
        self.clear_trails();
    }

    pub fn toggle_play(&mut self) {
        self.clock.toggle_play();
    }

    pub fn set_step_days(&mut self, step: f64) {
        self.clock.set_step(step);
    }

    /// Advance the clock against `now` and step to the resulting instant
    pub fn tick(&mut self, now: Instant) -> Result<&Frame> {
        let instant = self.clock.tick(now);
        self.step(instant)
    }

    /// Tick against the wall clock
    pub fn run_now(&mut self) -> Result<&Frame> {
        self.tick(time::now(self.config.time.timezone))
    }

    /// Compute everything for `instant`
    pub fn step(&mut self, instant: Instant) -> Result<&Frame> {
        let instant = instant.checked()?;
        let calendar = to_calendar(instant)?;
        self.observer.set_instant(instant);

        let earth = heliocentric_position(Body::Earth, instant)?;
        let scale = self.config.scale.scene_units_per_au;
        let near_scale = scale * self.config.scale.moon_distance_exaggeration;
        let earth_scene = earth.vector() * scale;
        let around_earth = |geo: &GeoEcliptic| earth_scene + geo.vector() * near_scale;

        let observer = &self.observer;
        let mut bodies = BTreeMap::new();

        compute_or_warn(&mut self.sun, observer, &earth);
        if let Some(s) = snapshot(&self.sun, observer, |helio, _| helio.vector() * scale) {
            bodies.insert(Body::Sun, s);
        }

        for planet in &mut self.planets {
            compute_or_warn(planet, observer, &earth);
            if let Some(s) = snapshot(&*planet, observer, |helio, _| helio.vector() * scale) {
                bodies.insert(planet.body(), s);
            }
        }

        compute_or_warn(&mut self.moon, observer, &earth);
        if let Some(s) = snapshot(&self.moon, observer, |_, geo| around_earth(geo)) {
            bodies.insert(Body::Moon, s);
        }
        let moon = self.moon.state().copied();

        let stale_days = self.config.detector.tle_stale_days;
        let mut satellites = Vec::with_capacity(self.satellites.len());
        for tracked in &mut self.satellites {
            let epoch_age_days = tracked.satellite.propagator().epoch_age_days(instant);
            if epoch_age_days.abs() > stale_days && !tracked.stale_warned {
                warn!(
                    "TLE for {} is {:.1} days from its epoch; positions will be inaccurate",
                    tracked.satellite.name(),
                    epoch_age_days
                );
                tracked.stale_warned = true;
            }

            let error = compute_or_warn(&mut tracked.satellite, observer, &earth);
            let snapshot = snapshot(&tracked.satellite, observer, |_, geo| around_earth(geo));
            let geocentric_scene = snapshot.as_ref().map(|s| s.geocentric.vector() * near_scale);
            satellites.push(SatelliteSnapshot {
                name: tracked.satellite.name().to_string(),
                epoch_age_days,
                snapshot,
                geocentric_scene,
                error,
            });
        }

        let axes = FrameAxes::for_observer(observer);
        let earth_direction = earth.direction();

        let events = self.detector.step(&Observation {
            instant,
            date: &calendar,
            earth_scene,
            moon_phase: moon.map(|m| (m.phase_index(), m.age() / SYNODIC_MONTH)),
        });
        if events.iter().any(|e| e.kind == EventKind::YearWrap) {
            debug!("Clearing trails at year wrap");
            self.clear_trails();
        }

        for (body, s) in &bodies {
            self.trails.entry(*body).or_default().push(s.scene);
        }
        for (tracked, s) in self.satellites.iter_mut().zip(&satellites) {
            if let (Some(snap), Some(geo)) = (&s.snapshot, s.geocentric_scene) {
                tracked.trail.push(snap.scene);
                tracked.geocentric_trail.push(geo);
            }
        }

        let hud = Hud {
            date: format_date_with_names(instant, &self.config.month_names)?,
            time: format_time(
                instant + self.config.time.display_utc_offset_hours / 24.0,
                true,
            )?,
            location: format!(
                "lng: {:.2}  lat: {:.2}",
                self.observer.longitude(),
                self.observer.latitude()
            ),
        };

        Ok(self.frame.insert(Frame {
            instant,
            calendar,
            hud,
            axes,
            earth_direction,
            bodies,
            satellites,
            moon,
            events,
        }))
    }
}

impl Tracked {
    fn new(tle: Tle) -> Self {
        Self {
            satellite: Satellite::new(tle),
            trail: Trail::new(),
            geocentric_trail: Trail::new(),
            stale_warned: false,
        }
    }
}

/// Compute one object, logging and returning the error message on failure
fn compute_or_warn(
    object: &mut dyn CelestialObject,
    observer: &Observer,
    earth: &HelioEcliptic,
) -> Option<String> {
    match object.compute(observer, earth) {
        Ok(()) => None,
        Err(e) => {
            warn!(
                "{} skipped at JD {:.5}: {}",
                object.name(),
                observer.instant().jd(),
                e
            );
            Some(e.to_string())
        }
    }
}

fn snapshot(
    object: &dyn CelestialObject,
    observer: &Observer,
    scene: impl FnOnce(&HelioEcliptic, &GeoEcliptic) -> Vector3<f64>,
) -> Option<BodySnapshot> {
    let heliocentric = object.heliocentric()?;
    let geocentric = object.geocentric()?;
    let equatorial = object.equatorial(observer)?;
    let horizontal = equatorial_to_horizontal(observer, &equatorial).alt_az();
    Some(BodySnapshot {
        name: object.name().to_string(),
        scene: scene(&heliocentric, &geocentric),
        heliocentric,
        geocentric,
        equatorial,
        horizontal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sgp::TleLines;
    use crate::time::to_instant;
    use approx::assert_abs_diff_eq;

    const ISS_NAME: &str = "ISS (ZARYA)";
    const ISS_LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    fn iss_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.observer.longitude = -3.70;
        config.observer.latitude = 40.42;
        config.satellites.push(TleLines {
            name: ISS_NAME.to_string(),
            line1: ISS_LINE1.to_string(),
            line2: ISS_LINE2.to_string(),
        });
        config
    }

    fn iss_epoch() -> Instant {
        Tle::parse(ISS_NAME, ISS_LINE1, ISS_LINE2).unwrap().epoch
    }

    #[test]
    fn test_every_body_present() {
        let mut engine = Solarium::new(EngineConfig::default(), Instant::J2000).unwrap();
        assert!(engine.frame().is_none());
        let frame = engine.step(Instant::J2000).unwrap();
        for body in Body::ALL {
            assert!(frame.body(body).is_some(), "{body} missing");
        }
        assert!(frame.moon.is_some());
        assert!(frame.events.is_empty());
    }

    #[test]
    fn test_earth_and_sun_geometry() {
        let mut engine = Solarium::new(EngineConfig::default(), Instant::J2000).unwrap();
        let frame = engine.step(Instant::J2000 + 123.4).unwrap();
        let earth = frame.body(Body::Earth).unwrap();
        assert_eq!(earth.geocentric, GeoEcliptic::zero());
        assert_eq!(frame.body(Body::Sun).unwrap().scene, Vector3::zeros());

        let direction = frame.earth_direction.unwrap();
        assert_abs_diff_eq!(direction.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            (earth.scene.normalize() - direction).norm(),
            0.0,
            epsilon = 1e-12
        );
        // Scene scale is 100 units per AU
        assert!(earth.scene.norm() > 98.0 && earth.scene.norm() < 102.0);
    }

    #[test]
    fn test_moon_scene_offset_from_earth() {
        let mut engine = Solarium::new(EngineConfig::default(), Instant::J2000).unwrap();
        let frame = engine.step(Instant::J2000).unwrap();
        let earth = frame.body(Body::Earth).unwrap().scene;
        let moon = frame.body(Body::Moon).unwrap();
        let offset = moon.scene - earth;
        assert_abs_diff_eq!(
            offset.norm(),
            moon.geocentric.distance() * 100.0 * 20.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_hud_strings() {
        let mut config = EngineConfig::default();
        config.observer.longitude = -3.7038;
        config.observer.latitude = 40.4168;
        config.time.display_utc_offset_hours = 4.0;
        let mut engine = Solarium::new(config, Instant::J2000).unwrap();
        let frame = engine.step(to_instant(2021, 3, 5.25).unwrap()).unwrap();
        assert_eq!(frame.hud.date, "2021 MAR 05");
        assert_eq!(frame.hud.time, "10:00:00");
        assert_eq!(frame.hud.location, "lng: -3.70  lat: 40.42");
    }

    #[test]
    fn test_satellite_snapshot_and_trails() {
        let epoch = iss_epoch();
        let mut engine = Solarium::new(iss_config(), epoch).unwrap();
        for i in 0..5 {
            engine.step(epoch + i as f64 * 0.01).unwrap();
        }
        let frame = engine.frame().unwrap();
        let iss = frame.satellite(ISS_NAME).unwrap();
        assert!(iss.error.is_none());
        let snap = iss.snapshot.as_ref().unwrap();
        let radius_km = snap.equatorial.to_km().norm();
        assert!(radius_km > 6700.0 && radius_km < 6760.0);
        let geo_scene = iss.geocentric_scene.unwrap();
        assert_abs_diff_eq!(
            (snap.scene - frame.body(Body::Earth).unwrap().scene - geo_scene).norm(),
            0.0,
            epsilon = 1e-9
        );

        let (helio, geo) = engine.satellite_trails(ISS_NAME).unwrap();
        assert_eq!(helio.len(), 5);
        assert_eq!(geo.len(), 5);
        assert_eq!(engine.trail(Body::Mars).unwrap().len(), 5);
    }

    #[test]
    fn test_repeated_instant_does_not_grow_trails() {
        let mut engine = Solarium::new(EngineConfig::default(), Instant::J2000).unwrap();
        engine.step(Instant::J2000).unwrap();
        engine.step(Instant::J2000).unwrap();
        assert_eq!(engine.trail(Body::Jupiter).unwrap().len(), 1);
    }

    #[test]
    fn test_decayed_satellite_is_degraded() {
        let epoch = iss_epoch();
        let mut engine = Solarium::new(iss_config(), epoch).unwrap();
        let mut decaying = Tle::parse(ISS_NAME, ISS_LINE1, ISS_LINE2).unwrap();
        decaying.name = "DECAYING".to_string();
        decaying.mean_motion_dot = 0.05;
        engine.add_satellite(decaying);

        let frame = engine.step(epoch + 200.0).unwrap();
        let decayed = frame.satellite("DECAYING").unwrap();
        assert!(decayed.snapshot.is_none());
        assert!(decayed.geocentric_scene.is_none());
        assert!(decayed.error.as_deref().unwrap().contains("decayed"));
        // The rest of the step still ran
        assert!(frame.satellite(ISS_NAME).unwrap().snapshot.is_some());
        assert!(frame.body(Body::Moon).is_some());
        assert_eq!(engine.satellite_trails("DECAYING").unwrap().0.len(), 0);
    }

    #[test]
    fn test_malformed_tle_fails_construction() {
        let mut config = iss_config();
        config.satellites[0].line1.replace_range(68..69, "0");
        assert!(Solarium::new(config, Instant::J2000).is_err());
    }

    #[test]
    fn test_invalid_instant_rejected() {
        let mut engine = Solarium::new(EngineConfig::default(), Instant::J2000).unwrap();
        let before_gregorian = Instant::J2000 - 200_000.0;
        assert!(engine.step(before_gregorian).is_err());
        assert!(engine.frame().is_none());

        let far_future = Instant::J2000 + 1.0e9;
        assert!(matches!(
            engine.step(far_future),
            Err(crate::SolariumError::Time(crate::time::TimeError::OutOfRange(_)))
        ));
        assert!(engine.frame().is_none());
        assert!(engine.step(Instant::J2000).is_ok());
    }

    #[test]
    fn test_scrubbing_clears_trails() {
        let mut engine = Solarium::new(EngineConfig::default(), Instant::J2000).unwrap();
        engine.toggle_play();
        for _ in 0..3 {
            engine.tick(Instant::J2000).unwrap();
        }
        assert_abs_diff_eq!(engine.clock().offset(), 0.3, epsilon = 1e-12);
        assert_eq!(engine.trail(Body::Venus).unwrap().len(), 3);

        engine.rewind();
        assert!(engine.trail(Body::Venus).unwrap().is_empty());
        engine.forward();
        engine.tick(Instant::J2000).unwrap();
        assert_eq!(engine.trail(Body::Venus).unwrap().len(), 1);

        engine.reset_time();
        assert_eq!(engine.clock().offset(), 0.0);
        assert!(engine.trail(Body::Venus).unwrap().is_empty());
    }
}
