//! A full simulated year through the engine

use solarium::almanac::{EventKind, Season};
use solarium::config::EngineConfig;
use solarium::sgp::{Tle, TleLines};
use solarium::time::to_instant;
use solarium::{Body, EventAnnotation, Instant, Solarium};

const ISS_NAME: &str = "ISS (ZARYA)";
const ISS_LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

fn run_year(engine: &mut Solarium, start: Instant, step: f64) -> Vec<EventAnnotation> {
    let steps = (366.0 / step) as usize;
    let mut events = Vec::new();
    for i in 0..=steps {
        let frame = engine.step(start + i as f64 * step).unwrap();
        events.extend(frame.events.iter().cloned());
    }
    events
}

#[test]
fn test_year_emits_months_and_seasons() {
    let _ = env_logger::builder().is_test(true).try_init();

    for step in [0.25, 1.0] {
        let start = to_instant(2021, 1, 15.0).unwrap();
        let mut engine = Solarium::new(EngineConfig::default(), start).unwrap();
        let events = run_year(&mut engine, start, step);

        let months: Vec<u32> = events
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::MonthTick { month } => Some(month),
                _ => None,
            })
            .collect();
        assert_eq!(months, vec![2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 1], "step {step}");

        let seasons: Vec<EventKind> = events
            .iter()
            .filter(|e| e.kind.is_equinox_or_solstice())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            seasons,
            vec![
                EventKind::Equinox(Season::March),
                EventKind::Solstice(Season::June),
                EventKind::Equinox(Season::September),
                EventKind::Solstice(Season::December),
            ],
            "step {step}"
        );

        let wraps: Vec<_> = events
            .iter()
            .filter(|e| e.kind == EventKind::YearWrap)
            .collect();
        assert_eq!(wraps.len(), 1);
        assert_eq!(wraps[0].label.as_deref(), Some("2022-01-15"));
    }
}

#[test]
fn test_moon_phase_changes_over_a_year() {
    let start = to_instant(2021, 1, 15.0).unwrap();
    let mut engine = Solarium::new(EngineConfig::default(), start).unwrap();
    let events = run_year(&mut engine, start, 0.25);
    let phases: Vec<u8> = events
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::MoonPhase { index, .. } => Some(index),
            _ => None,
        })
        .collect();
    // About 12.4 synodic months of 8 phases each
    assert!(phases.len() > 90 && phases.len() < 105, "{}", phases.len());
    for pair in phases.windows(2) {
        assert_eq!(pair[1], (pair[0] + 1) % 8);
    }
}

#[test]
fn test_year_wrap_clears_log_and_trails() {
    let start = to_instant(2021, 1, 15.0).unwrap();
    let mut engine = Solarium::new(EngineConfig::default(), start).unwrap();
    let mut wrapped_at = None;
    let mut emitted = Vec::new();
    for i in 0..=366 {
        let frame = engine.step(start + i as f64).unwrap();
        if frame.year_wrapped() {
            wrapped_at = Some(i);
            emitted = frame.events.clone();
            break;
        }
    }
    assert_eq!(wrapped_at, Some(365));
    emitted.retain(|e| e.kind != EventKind::YearWrap);
    assert_eq!(engine.annotations(), emitted.as_slice());
    assert_eq!(engine.trail(Body::Earth).unwrap().len(), 1);

    // The step after a wrap reschedules and still ticks its day
    let next = engine.step(start + 366.0).unwrap().events.clone();
    assert!(next
        .iter()
        .any(|e| matches!(e.kind, EventKind::DayTick { .. })));
    emitted.extend(next);
    assert_eq!(engine.annotations(), emitted.as_slice());
    assert_eq!(engine.trail(Body::Earth).unwrap().len(), 2);
}

#[test]
fn test_every_year_has_twelve_month_ticks() {
    // Wraps land on the 31st, so the following step must still tick the month
    let start = to_instant(2021, 1, 31.5).unwrap();
    let mut engine = Solarium::new(EngineConfig::default(), start).unwrap();
    let mut per_year: Vec<Vec<u32>> = vec![Vec::new()];
    for i in 0..=1200 {
        let frame = engine.step(start + i as f64).unwrap();
        if frame.year_wrapped() {
            per_year.push(Vec::new());
            if per_year.len() == 4 {
                break;
            }
            continue;
        }
        if let Some(months) = per_year.last_mut() {
            months.extend(frame.events.iter().filter_map(|e| match e.kind {
                EventKind::MonthTick { month } => Some(month),
                _ => None,
            }));
        }
    }
    assert_eq!(per_year.len(), 4);
    for months in &per_year[1..3] {
        assert_eq!(months.len(), 12, "{months:?}");
    }
}

#[test]
fn test_earth_geocentric_zero_all_year() {
    let start = to_instant(2021, 1, 1.0).unwrap();
    let mut engine = Solarium::new(EngineConfig::default(), start).unwrap();
    for i in 0..73 {
        let frame = engine.step(start + i as f64 * 5.0).unwrap();
        let earth = frame.body(Body::Earth).unwrap();
        assert_eq!(earth.geocentric.vector().norm(), 0.0);
    }
}

#[test]
fn test_degraded_satellite_does_not_stop_the_year() {
    let mut config = EngineConfig::default();
    config.satellites.push(TleLines {
        name: ISS_NAME.to_string(),
        line1: ISS_LINE1.to_string(),
        line2: ISS_LINE2.to_string(),
    });
    let epoch = Tle::parse(ISS_NAME, ISS_LINE1, ISS_LINE2).unwrap().epoch;
    let mut engine = Solarium::new(config, epoch).unwrap();

    let mut decaying = Tle::parse(ISS_NAME, ISS_LINE1, ISS_LINE2).unwrap();
    decaying.name = "REENTRY".to_string();
    decaying.mean_motion_dot = 0.05;
    engine.add_satellite(decaying);

    let mut available = 0;
    let mut degraded = 0;
    for i in 0..60 {
        let frame = engine.step(epoch + i as f64 * 5.0).unwrap();
        assert_eq!(frame.bodies.len(), Body::ALL.len());
        let sat = frame.satellite("REENTRY").unwrap();
        match &sat.snapshot {
            Some(_) => available += 1,
            None => {
                assert!(sat.error.is_some());
                degraded += 1;
            }
        }
    }
    assert!(available > 0);
    assert!(degraded > 0);
}
