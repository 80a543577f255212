//! Celestial body definitions and calculations
//!
//! Every drawable object implements [`CelestialObject`]: it is recomputed
//! once per step from the shared [`Observer`] and the Earth's heliocentric
//! position, then exposes both its heliocentric and geocentric ecliptic
//! positions. A failed computation leaves the object without positions for
//! that step.

use crate::coordinates::{GeoEcliptic, GeoEquatorial, GeoHorizontal, HelioEcliptic};
use crate::framelib::{
    ecliptic_to_equatorial, equatorial_to_ecliptic, equatorial_to_horizontal,
    geocentric_to_heliocentric, heliocentric_to_geocentric, sun_geocentric, sun_heliocentric,
};
use crate::observer::Observer;
use crate::planetlib::{Body, LunarState, Luna, OrbitalElements};
use crate::sgp::{Propagator, Tle};
use crate::Result;

/// A trait for objects that have a position in the sky
pub trait CelestialObject {
    fn name(&self) -> &str;

    /// Recompute positions for the observer's current instant
    fn compute(&mut self, observer: &Observer, earth: &HelioEcliptic) -> Result<()>;

    /// Position relative to the Sun from the last successful compute
    fn heliocentric(&self) -> Option<HelioEcliptic>;

    /// Position relative to the Earth from the last successful compute
    fn geocentric(&self) -> Option<GeoEcliptic>;

    fn equatorial(&self, observer: &Observer) -> Option<GeoEquatorial> {
        self.geocentric()
            .map(|geo| ecliptic_to_equatorial(observer, &geo))
    }

    fn horizontal(&self, observer: &Observer) -> Option<GeoHorizontal> {
        self.equatorial(observer)
            .map(|eq| equatorial_to_horizontal(observer, &eq))
    }
}

/// The Sun, fixed at the heliocentric origin
#[derive(Debug, Clone, Default)]
pub struct Sun {
    geo: Option<GeoEcliptic>,
}

impl Sun {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CelestialObject for Sun {
    fn name(&self) -> &str {
        Body::Sun.name()
    }

    fn compute(&mut self, _observer: &Observer, earth: &HelioEcliptic) -> Result<()> {
        self.geo = Some(sun_geocentric(earth));
        Ok(())
    }

    fn heliocentric(&self) -> Option<HelioEcliptic> {
        Some(sun_heliocentric())
    }

    fn geocentric(&self) -> Option<GeoEcliptic> {
        self.geo
    }
}

/// A planet (or the Earth) on Keplerian elements
#[derive(Debug, Clone)]
pub struct Planet {
    body: Body,
    elements: &'static OrbitalElements,
    helio: Option<HelioEcliptic>,
    geo: Option<GeoEcliptic>,
}

impl Planet {
    pub fn new(body: Body) -> Result<Self> {
        Ok(Self {
            body,
            elements: OrbitalElements::for_body(body)?,
            helio: None,
            geo: None,
        })
    }

    pub fn body(&self) -> Body {
        self.body
    }
}

impl CelestialObject for Planet {
    fn name(&self) -> &str {
        self.body.name()
    }

    fn compute(&mut self, observer: &Observer, earth: &HelioEcliptic) -> Result<()> {
        self.helio = None;
        self.geo = None;
        let helio = self.elements.position(observer.instant())?;
        self.geo = Some(heliocentric_to_geocentric(&helio, earth));
        self.helio = Some(helio);
        Ok(())
    }

    fn heliocentric(&self) -> Option<HelioEcliptic> {
        self.helio
    }

    fn geocentric(&self) -> Option<GeoEcliptic> {
        self.geo
    }
}

/// The Moon, computed geocentrically
#[derive(Debug, Clone, Default)]
pub struct Moon {
    luna: Luna,
    state: Option<LunarState>,
    helio: Option<HelioEcliptic>,
}

impl Moon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase and distance details from the last compute
    pub fn state(&self) -> Option<&LunarState> {
        self.state.as_ref()
    }
}

impl CelestialObject for Moon {
    fn name(&self) -> &str {
        Body::Moon.name()
    }

    fn compute(&mut self, observer: &Observer, earth: &HelioEcliptic) -> Result<()> {
        self.state = None;
        self.helio = None;
        let state = self.luna.state(observer.instant())?;
        self.helio = Some(geocentric_to_heliocentric(&state.position, earth));
        self.state = Some(state);
        Ok(())
    }

    fn heliocentric(&self) -> Option<HelioEcliptic> {
        self.helio
    }

    fn geocentric(&self) -> Option<GeoEcliptic> {
        self.state.map(|s| s.position)
    }
}

/// An Earth satellite propagated from its TLE
#[derive(Debug, Clone)]
pub struct Satellite {
    propagator: Propagator,
    equatorial: Option<GeoEquatorial>,
    geo: Option<GeoEcliptic>,
    helio: Option<HelioEcliptic>,
}

impl Satellite {
    pub fn new(tle: Tle) -> Self {
        Self {
            propagator: Propagator::new(tle),
            equatorial: None,
            geo: None,
            helio: None,
        }
    }

    pub fn tle(&self) -> &Tle {
        self.propagator.tle()
    }

    pub fn propagator(&self) -> &Propagator {
        &self.propagator
    }
}

impl CelestialObject for Satellite {
    fn name(&self) -> &str {
        &self.propagator.tle().name
    }

    fn compute(&mut self, observer: &Observer, earth: &HelioEcliptic) -> Result<()> {
        self.equatorial = None;
        self.geo = None;
        self.helio = None;
        let equatorial = self.propagator.propagate(observer.instant())?;
        let geo = equatorial_to_ecliptic(observer, &equatorial);
        self.helio = Some(geocentric_to_heliocentric(&geo, earth));
        self.geo = Some(geo);
        self.equatorial = Some(equatorial);
        Ok(())
    }

    fn heliocentric(&self) -> Option<HelioEcliptic> {
        self.helio
    }

    fn geocentric(&self) -> Option<GeoEcliptic> {
        self.geo
    }

    // The propagator already works in the equatorial frame
    fn equatorial(&self, _observer: &Observer) -> Option<GeoEquatorial> {
        self.equatorial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planetlib::heliocentric_position;
    use crate::time::Instant;
    use approx::assert_abs_diff_eq;

    fn setup(jd: f64) -> (Observer, HelioEcliptic) {
        let instant = Instant::from_jd(jd).unwrap();
        let observer = Observer::new(-73.98, 40.75, instant).unwrap();
        let earth = heliocentric_position(Body::Earth, instant).unwrap();
        (observer, earth)
    }

    #[test]
    fn test_earth_geocentric_is_zero() {
        for jd in [2_451_545.0, 2_455_197.5, 2_460_000.123] {
            let (observer, earth) = setup(jd);
            let mut planet = Planet::new(Body::Earth).unwrap();
            planet.compute(&observer, &earth).unwrap();
            assert_eq!(planet.geocentric(), Some(GeoEcliptic::zero()));
        }
    }

    #[test]
    fn test_sun_positions() {
        let (observer, earth) = setup(2_458_849.5);
        let mut sun = Sun::new();
        assert!(sun.geocentric().is_none());
        sun.compute(&observer, &earth).unwrap();
        assert_eq!(sun.heliocentric(), Some(HelioEcliptic::zero()));
        let geo = sun.geocentric().unwrap();
        assert_abs_diff_eq!((geo.vector() + earth.vector()).norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_sun_equatorial_at_december_solstice() {
        // 2019-12-22 04:19 UTC: declination -23.44°
        let (observer, earth) = setup(2_458_839.68);
        let mut sun = Sun::new();
        sun.compute(&observer, &earth).unwrap();
        let (_, dec, _) = sun.equatorial(&observer).unwrap().to_spherical();
        assert_abs_diff_eq!(dec.to_degrees(), -23.44, epsilon = 0.05);
    }

    #[test]
    fn test_planet_geocentric_consistent() {
        let (observer, earth) = setup(2_459_580.5);
        let mut mars = Planet::new(Body::Mars).unwrap();
        mars.compute(&observer, &earth).unwrap();
        let helio = mars.heliocentric().unwrap();
        let geo = mars.geocentric().unwrap();
        assert_abs_diff_eq!(
            (helio.vector() - earth.vector() - geo.vector()).norm(),
            0.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_sun_and_moon_are_not_planets() {
        assert!(Planet::new(Body::Sun).is_err());
        assert!(Planet::new(Body::Moon).is_err());
    }

    #[test]
    fn test_moon_near_earth() {
        let (observer, earth) = setup(2_451_550.26);
        let mut moon = Moon::new();
        moon.compute(&observer, &earth).unwrap();
        let geo = moon.geocentric().unwrap();
        assert!(geo.distance() > 0.0023 && geo.distance() < 0.0028);
        let helio = moon.heliocentric().unwrap();
        assert_abs_diff_eq!((helio.vector() - earth.vector()).norm(), geo.distance(), epsilon = 1e-15);
        assert!(moon.state().is_some());
    }

    #[test]
    fn test_satellite_positions() {
        let tle = Tle::parse(
            "ISS (ZARYA)",
            "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927",
            "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537",
        )
        .unwrap();
        let (observer, earth) = setup(tle.epoch.jd() + 0.2);
        let mut sat = Satellite::new(tle);
        sat.compute(&observer, &earth).unwrap();
        assert_eq!(sat.name(), "ISS (ZARYA)");

        let eq = sat.equatorial(&observer).unwrap();
        let geo = sat.geocentric().unwrap();
        assert_abs_diff_eq!(eq.to_km().norm(), geo.to_km().norm(), epsilon = 1e-6);
        // Round trip through the ecliptic agrees with the stored equatorial vector
        let back = ecliptic_to_equatorial(&observer, &geo);
        assert_abs_diff_eq!((back.to_km() - eq.to_km()).norm(), 0.0, epsilon = 1e-6);
        assert!(sat.horizontal(&observer).is_some());
    }
}
