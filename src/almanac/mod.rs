//! Calendar and astronomical event detection
//!
//! The [`EventDetector`] is advanced once per simulated step with the new
//! calendar date, the Earth's scene position and the Moon's phase. It emits
//! edge-triggered [`EventAnnotation`]s for day and month boundaries,
//! equinoxes and solstices, Moon phase changes and the yearly reset, and
//! keeps a running log of them until the year wraps.
//!
//! Equinoxes and solstices are geometric: the Earth's heliocentric
//! direction `ê` lines up with the equinox axis (`|ê·x̂|` close to 1) or
//! stands perpendicular to it (`|ê·x̂|` close to 0). Each kind is latched
//! after it fires and released once `ê` has moved well away from the axis,
//! and a sign change of the relevant component between two steps counts as
//! a crossing, so coarse steps neither repeat nor miss an event.

use crate::time::{day_of_week, CalendarDate, Instant};
use log::{debug, info};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Scene-unit radii along the Earth direction used for annotation geometry
const HUD_OUTER: f64 = 90.0;
const MONTH_TICK_INNER: f64 = 80.0;
const MONTH_LABEL: f64 = 70.0;
const DAY_TICK_INNER: f64 = 85.0;
const SUNDAY_TICK_INNER: f64 = 82.5;
const SEASON_LABEL: f64 = 104.0;
const SEASON_LABEL_LIFT: f64 = 2.0;
const MOON_PHASE_ANCHOR: f64 = 110.0;

/// Minimum off-axis component for a sign change to count as a crossing
const CROSSING_MIN_COMPONENT: f64 = 0.5;

/// Which equinox or solstice, named by the month it falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    March,
    June,
    September,
    December,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    DayTick { sunday: bool },
    MonthTick { month: u32 },
    Equinox(Season),
    Solstice(Season),
    MoonPhase { index: u8, fraction: f64 },
    YearWrap,
}

impl EventKind {
    pub fn is_equinox_or_solstice(&self) -> bool {
        matches!(self, EventKind::Equinox(_) | EventKind::Solstice(_))
    }
}

/// Line segment in scene units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,
}

/// One emitted event with the geometry a HUD needs to draw it
#[derive(Debug, Clone, PartialEq)]
pub struct EventAnnotation {
    pub kind: EventKind,
    pub instant: Instant,
    pub segment: Option<Segment>,
    /// Where the label or phase glyph is placed
    pub anchor: Option<Vector3<f64>>,
    pub label: Option<String>,
}

/// Dot-product thresholds for equinox and solstice detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Equinox when `|ê·x̂|` exceeds this
    pub equinox_alignment: f64,
    /// Solstice when `|ê·x̂|` is below this
    pub solstice_orthogonality: f64,
    /// Angle from the axis, in degrees, beyond which a latch is released
    pub latch_release_degrees: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            equinox_alignment: 0.999_999_5,
            solstice_orthogonality: 0.001,
            latch_release_degrees: 1.0,
        }
    }
}

/// What the detector sees at each step
#[derive(Debug, Clone)]
pub struct Observation<'a> {
    pub instant: Instant,
    pub date: &'a CalendarDate,
    /// Heliocentric Earth position in scene units
    pub earth_scene: Vector3<f64>,
    /// Moon phase index and fraction of the synodic month
    pub moon_phase: Option<(u8, f64)>,
}

#[derive(Debug, Clone, Copy)]
struct Previous {
    month: u32,
    day: u32,
    direction: Option<Vector3<f64>>,
    moon_phase: Option<u8>,
}

/// Stateful detector of calendar and astronomical events
#[derive(Debug, Clone)]
pub struct EventDetector {
    month_names: [String; 12],
    thresholds: Thresholds,
    previous: Option<Previous>,
    year_target: Option<(i32, u32, u32)>,
    equinox_latched: bool,
    solstice_latched: bool,
    log: Vec<EventAnnotation>,
}

impl EventDetector {
    pub fn new(month_names: [String; 12], thresholds: Thresholds) -> Self {
        Self {
            month_names,
            thresholds,
            previous: None,
            year_target: None,
            equinox_latched: false,
            solstice_latched: false,
            log: Vec::new(),
        }
    }

    /// Annotations emitted since the last year wrap
    pub fn annotations(&self) -> &[EventAnnotation] {
        &self.log
    }

    /// Date that will trigger the next year wrap, once scheduled
    pub fn year_target(&self) -> Option<(i32, u32, u32)> {
        self.year_target
    }

    /// Forget all history: the next step only seeds state
    pub fn reset(&mut self) {
        self.previous = None;
        self.year_target = None;
        self.equinox_latched = false;
        self.solstice_latched = false;
        self.log.clear();
    }

    /// Advance one step and return the annotations newly emitted
    pub fn step(&mut self, obs: &Observation<'_>) -> Vec<EventAnnotation> {
        let date = obs.date;
        let direction = obs.earth_scene.try_normalize(f64::MIN_POSITIVE);
        let moon_index = obs.moon_phase.map(|(index, _)| index);

        let Some(previous) = self.previous else {
            self.seed(obs, direction);
            return Vec::new();
        };

        let mut events = Vec::new();
        let e_hat = direction.unwrap_or_else(Vector3::zeros);

        if let Some((index, fraction)) = obs.moon_phase {
            if previous.moon_phase.is_some_and(|p| p != index) {
                events.push(EventAnnotation {
                    kind: EventKind::MoonPhase { index, fraction },
                    instant: obs.instant,
                    segment: None,
                    anchor: Some(e_hat * MOON_PHASE_ANCHOR),
                    label: None,
                });
            }
        }

        if let Some(current) = direction {
            events.extend(self.detect_seasons(obs, previous.direction, current));
        }

        let wrapped = match self.year_target {
            None => {
                self.schedule_year(date);
                false
            }
            Some(target) => date.ymd() >= target,
        };
        if wrapped {
            info!(
                "Year wrap at {:04}-{:02}-{:02}, clearing {} annotations",
                date.year,
                date.month,
                date.day,
                self.log.len()
            );
            self.log.clear();
            self.year_target = None;
            events.push(EventAnnotation {
                kind: EventKind::YearWrap,
                instant: obs.instant,
                segment: None,
                anchor: None,
                label: Some(format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)),
            });
        }

        if date.month != previous.month && date.day == 1 {
            let label = self.month_names[(date.month - 1) as usize].clone();
            events.push(EventAnnotation {
                kind: EventKind::MonthTick { month: date.month },
                instant: obs.instant,
                segment: Some(Segment {
                    a: e_hat * MONTH_TICK_INNER,
                    b: e_hat * HUD_OUTER,
                }),
                anchor: Some(e_hat * MONTH_LABEL),
                label: Some(label),
            });
        } else if date.day != previous.day {
            let sunday = day_of_week(obs.instant) == 0;
            let inner = if sunday { SUNDAY_TICK_INNER } else { DAY_TICK_INNER };
            events.push(EventAnnotation {
                kind: EventKind::DayTick { sunday },
                instant: obs.instant,
                segment: Some(Segment {
                    a: e_hat * inner,
                    b: e_hat * HUD_OUTER,
                }),
                anchor: None,
                label: None,
            });
        }

        // The wrap marker itself is returned but never logged
        self.log.extend(
            events
                .iter()
                .filter(|e| e.kind != EventKind::YearWrap)
                .cloned(),
        );

        self.previous = Some(Previous {
            month: date.month,
            day: date.day,
            direction: direction.or(previous.direction),
            moon_phase: moon_index.or(previous.moon_phase),
        });

        events
    }

    fn seed(&mut self, obs: &Observation<'_>, direction: Option<Vector3<f64>>) {
        if let Some(e_hat) = direction {
            let d = e_hat.x.abs();
            self.equinox_latched = d > self.thresholds.equinox_alignment;
            self.solstice_latched = d < self.thresholds.solstice_orthogonality;
        }
        self.schedule_year(obs.date);
        self.previous = Some(Previous {
            month: obs.date.month,
            day: obs.date.day,
            direction,
            moon_phase: obs.moon_phase.map(|(index, _)| index),
        });
    }

    fn schedule_year(&mut self, date: &CalendarDate) {
        let target = (date.year + 1, date.month, date.day);
        info!(
            "Next year wrap scheduled for {:04}-{:02}-{:02}",
            target.0, target.1, target.2
        );
        self.year_target = Some(target);
    }

    fn detect_seasons(
        &mut self,
        obs: &Observation<'_>,
        previous: Option<Vector3<f64>>,
        e_hat: Vector3<f64>,
    ) -> Vec<EventAnnotation> {
        let t = self.thresholds;
        let along = e_hat.x.abs();
        let release = t.latch_release_degrees.to_radians();

        let crossed = |component: fn(&Vector3<f64>) -> f64, other: fn(&Vector3<f64>) -> f64| {
            previous.is_some_and(|p| {
                component(&p).signum() != component(&e_hat).signum()
                    && other(&p).abs() > CROSSING_MIN_COMPONENT
                    && other(&e_hat).abs() > CROSSING_MIN_COMPONENT
            })
        };

        // Release latches once well clear of the axis
        if along < release.cos() {
            self.equinox_latched = false;
        }
        if along > release.sin() {
            self.solstice_latched = false;
        }

        let mut events = Vec::new();

        let equinox = along > t.equinox_alignment || crossed(|v| v.y, |v| v.x);
        if equinox && !self.equinox_latched {
            self.equinox_latched = true;
            // Earth on the -X side puts the Sun at longitude 0
            let season = if e_hat.x < 0.0 {
                Season::March
            } else {
                Season::September
            };
            debug!("Equinox ({season:?}) at JD {:.5}", obs.instant.jd());
            events.push(self.season_annotation(obs, e_hat, EventKind::Equinox(season), "Eq."));
        }

        let solstice = along < t.solstice_orthogonality || crossed(|v| v.x, |v| v.y);
        if solstice && !self.solstice_latched {
            self.solstice_latched = true;
            // Earth on the -Y side puts the Sun at longitude 90°
            let season = if e_hat.y < 0.0 {
                Season::June
            } else {
                Season::December
            };
            debug!("Solstice ({season:?}) at JD {:.5}", obs.instant.jd());
            events.push(self.season_annotation(obs, e_hat, EventKind::Solstice(season), "So."));
        }

        events
    }

    fn season_annotation(
        &self,
        obs: &Observation<'_>,
        e_hat: Vector3<f64>,
        kind: EventKind,
        prefix: &str,
    ) -> EventAnnotation {
        EventAnnotation {
            kind,
            instant: obs.instant,
            segment: Some(Segment {
                a: obs.earth_scene,
                b: e_hat * HUD_OUTER,
            }),
            anchor: Some(e_hat * SEASON_LABEL + Vector3::new(0.0, 0.0, SEASON_LABEL_LIFT)),
            label: Some(format!("{prefix} {:02}", obs.date.day)),
        }
    }
}

/// Three-letter English month abbreviations
pub fn default_month_names() -> [String; 12] {
    [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ]
    .map(String::from)
}
