//! Engine configuration
//!
//! Everything the engine needs at construction time: observer location,
//! time stepping, scene scaling, lookup tables and which layers a consumer
//! displays. Loaded from JSON; every field has a default so a partial file
//! is enough.

use crate::almanac::{default_month_names, Thresholds};
use crate::sgp::TleLines;
use crate::time::TimezoneMode;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid location: longitude {longitude}, latitude {latitude}")]
    InvalidLocation { longitude: f64, latitude: f64 },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Observer location in degrees, east and north positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub longitude: f64,
    pub latitude: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        // Greenwich
        Self {
            longitude: 0.0,
            latitude: 51.4779,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Days advanced per step while playing
    pub step_days: f64,
    /// Offset applied to the formatted HUD time
    pub display_utc_offset_hours: f64,
    pub timezone: TimezoneMode,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            step_days: 0.1,
            display_utc_offset_hours: 0.0,
            timezone: TimezoneMode::Utc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub scene_units_per_au: f64,
    /// Extra factor on geocentric distances of the Moon and satellites
    pub moon_distance_exaggeration: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            scene_units_per_au: 100.0,
            moon_distance_exaggeration: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    #[serde(flatten)]
    pub thresholds: Thresholds,
    /// Warn once per satellite when its TLE is older than this
    pub tle_stale_days: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            tle_stale_days: 30.0,
        }
    }
}

/// What a consumer shows; the engine computes everything regardless
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layers {
    pub show_trails: bool,
    pub show_moon_phases: bool,
    pub show_equatorial_grid: bool,
    pub show_equatorial_directions: bool,
    pub show_horizon_dial: bool,
    pub show_bodies_horizontal: bool,
    pub show_hud_lines: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            show_trails: true,
            show_moon_phases: true,
            show_equatorial_grid: false,
            show_equatorial_directions: true,
            show_horizon_dial: false,
            show_bodies_horizontal: false,
            show_hud_lines: true,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub observer: ObserverConfig,
    pub time: TimeConfig,
    pub scale: ScaleConfig,
    pub month_names: [String; 12],
    pub satellites: Vec<TleLines>,
    pub detector: DetectorConfig,
    pub layers: Layers,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            observer: ObserverConfig::default(),
            time: TimeConfig::default(),
            scale: ScaleConfig::default(),
            month_names: default_month_names(),
            satellites: Vec::new(),
            detector: DetectorConfig::default(),
            layers: Layers::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!(
            "Loaded config from {} ({} satellites)",
            path.display(),
            config.satellites.len()
        );
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ObserverConfig {
            longitude,
            latitude,
        } = self.observer;
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::InvalidLocation {
                longitude,
                latitude,
            });
        }

        positive("time.step_days", self.time.step_days)?;
        positive("scale.scene_units_per_au", self.scale.scene_units_per_au)?;
        positive(
            "scale.moon_distance_exaggeration",
            self.scale.moon_distance_exaggeration,
        )?;
        positive("detector.tle_stale_days", self.detector.tle_stale_days)?;
        positive(
            "detector.latch_release_degrees",
            self.detector.thresholds.latch_release_degrees,
        )?;

        if !self.time.display_utc_offset_hours.is_finite()
            || self.time.display_utc_offset_hours.abs() > 14.0
        {
            return Err(ConfigError::InvalidValue {
                field: "time.display_utc_offset_hours",
                reason: format!("{} is outside ±14 h", self.time.display_utc_offset_hours),
            });
        }

        let t = &self.detector.thresholds;
        if !(0.0..1.0).contains(&t.equinox_alignment) {
            return Err(ConfigError::InvalidValue {
                field: "detector.equinox_alignment",
                reason: format!("{} is outside [0, 1)", t.equinox_alignment),
            });
        }
        if !(0.0..1.0).contains(&t.solstice_orthogonality) || t.solstice_orthogonality == 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "detector.solstice_orthogonality",
                reason: format!("{} is outside (0, 1)", t.solstice_orthogonality),
            });
        }

        if let Some(empty) = self.month_names.iter().position(|n| n.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "month_names",
                reason: format!("entry {} is empty", empty + 1),
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} must be a positive number"),
        })
    }
}
