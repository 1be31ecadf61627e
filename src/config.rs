//! Configuration management for detector tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling fast iteration without recompilation. Pipeline constants,
//! calibration parameters and sensor settings can be adjusted via the
//! config file; every field falls back to its default when omitted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::filter::{DEFAULT_ALPHA, GRAVITY};
use crate::analysis::history::DEFAULT_HISTORY_CAPACITY;
use crate::analysis::pattern::{DEFAULT_MAX_VARIATION, DEFAULT_MIN_VARIATION, PATTERN_WINDOW};
use crate::profile::ActivityMode;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "PEDOMETER_CONFIG";

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "assets/pedometer_config.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub calibration: CalibrationConfig,
    pub sensor: SensorConfig,
    /// Activity profile applied when the detector is constructed
    pub activity_mode: ActivityMode,
}

/// Signal pipeline parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of filtered magnitudes kept in history
    pub history_capacity: usize,
    /// Low-pass smoothing factor in (0, 1]
    pub filter_alpha: f64,
    /// Average variation at or below this is treated as rest
    pub min_pattern_variation: f64,
    /// Average variation at or above this is treated as shaking
    pub max_pattern_variation: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            filter_alpha: DEFAULT_ALPHA,
            min_pattern_variation: DEFAULT_MIN_VARIATION,
            max_pattern_variation: DEFAULT_MAX_VARIATION,
        }
    }
}

/// Calibration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Number of samples consumed before detection starts
    pub sample_count: usize,
    /// Lower bound for the calibrated threshold
    pub min_threshold: f64,
    /// Threshold = max(min_threshold, std_dev_multiplier * std_dev)
    pub std_dev_multiplier: f64,
    /// Baseline reported while uncalibrated
    pub gravity: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            sample_count: 50,
            min_threshold: 1.5,
            std_dev_multiplier: 2.0,
            gravity: GRAVITY,
        }
    }
}

/// Units the sensor source reports acceleration in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccelerationUnits {
    /// m/s², passed through unchanged
    #[default]
    MetersPerSecondSquared,
    /// Multiples of standard gravity, scaled by `CalibrationConfig::gravity`
    StandardGravity,
}

/// Sensor source settings applied on start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Requested delivery interval (~60 Hz)
    pub sample_interval_ms: u64,
    pub units: AccelerationUnits,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 16,
            units: AccelerationUnits::MetersPerSecondSquared,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or defaults if the file doesn't exist or the
    /// JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config.sanitized()
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from `$PEDOMETER_CONFIG` or the default asset path
    pub fn load() -> Self {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from_file(path),
            Err(_) => Self::load_from_file(DEFAULT_CONFIG_PATH),
        }
    }

    /// Clamp values the pipeline cannot operate with
    pub fn sanitized(mut self) -> Self {
        if self.pipeline.history_capacity < PATTERN_WINDOW {
            log::warn!(
                "[Config] history_capacity {} too small, using {}",
                self.pipeline.history_capacity,
                PATTERN_WINDOW
            );
            self.pipeline.history_capacity = PATTERN_WINDOW;
        }
        if !(self.pipeline.filter_alpha > 0.0 && self.pipeline.filter_alpha <= 1.0) {
            log::warn!(
                "[Config] filter_alpha {} outside (0, 1], using {}",
                self.pipeline.filter_alpha,
                DEFAULT_ALPHA
            );
            self.pipeline.filter_alpha = DEFAULT_ALPHA;
        }
        self.calibration.sample_count = self.calibration.sample_count.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.history_capacity, 10);
        assert_eq!(config.pipeline.filter_alpha, 0.8);
        assert_eq!(config.calibration.sample_count, 50);
        assert_eq!(config.calibration.min_threshold, 1.5);
        assert_eq!(config.sensor.sample_interval_ms, 16);
        assert_eq!(config.activity_mode, ActivityMode::Default);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.pipeline.filter_alpha, config.pipeline.filter_alpha);
        assert_eq!(
            parsed.calibration.sample_count,
            config.calibration.sample_count
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "activity_mode": "running", "sensor": { "units": "standard_gravity" } }"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.activity_mode, ActivityMode::Running);
        assert_eq!(parsed.sensor.units, AccelerationUnits::StandardGravity);
        assert_eq!(parsed.sensor.sample_interval_ms, 16);
        assert_eq!(parsed.pipeline.history_capacity, 10);
    }

    #[test]
    fn test_sanitized_clamps_invalid_values() {
        let mut config = AppConfig::default();
        config.pipeline.history_capacity = 2;
        config.pipeline.filter_alpha = 0.0;
        config.calibration.sample_count = 0;

        let config = config.sanitized();
        assert_eq!(config.pipeline.history_capacity, 5);
        assert_eq!(config.pipeline.filter_alpha, 0.8);
        assert_eq!(config.calibration.sample_count, 1);
    }

    #[test]
    fn test_bundled_asset_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/pedometer_config.json");
        let contents = fs::read_to_string(path).unwrap();
        let parsed: AppConfig = serde_json::from_str(&contents).unwrap();

        assert_eq!(parsed.pipeline.history_capacity, 10);
        assert_eq!(parsed.calibration.std_dev_multiplier, 2.0);
        assert_eq!(parsed.sensor.units, AccelerationUnits::MetersPerSecondSquared);
        assert_eq!(parsed.activity_mode, ActivityMode::Default);
    }

    #[test]
    fn test_load_reads_path_from_env() {
        let path = std::env::temp_dir().join(format!(
            "pedometer_config_{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"{ "calibration": { "sample_count": 20 }, "activity_mode": "hiking" }"#,
        )
        .unwrap();

        std::env::set_var(CONFIG_PATH_ENV, &path);
        let config = AppConfig::load();
        std::env::remove_var(CONFIG_PATH_ENV);
        let _ = fs::remove_file(&path);

        assert_eq!(config.calibration.sample_count, 20);
        assert_eq!(config.activity_mode, ActivityMode::Hiking);
        assert_eq!(config.pipeline.history_capacity, 10);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("does/not/exist.json");
        assert_eq!(config.calibration.sample_count, 50);
    }
}
