//! Activity profiles: named threshold/timeout bundles selectable at runtime.
//!
//! Selecting a profile overwrites the three tunables of [`DetectorConfig`] and
//! nothing else. Calibration state and history are untouched.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Locomotion style the detector is tuned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityMode {
    Walking,
    Running,
    Hiking,
    #[default]
    Default,
}

impl ActivityMode {
    pub const ALL: [ActivityMode; 4] = [
        ActivityMode::Walking,
        ActivityMode::Running,
        ActivityMode::Hiking,
        ActivityMode::Default,
    ];

    /// Parse a mode name; anything unrecognised selects [`ActivityMode::Default`]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "walking" => ActivityMode::Walking,
            "running" => ActivityMode::Running,
            "hiking" => ActivityMode::Hiking,
            _ => ActivityMode::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityMode::Walking => "walking",
            ActivityMode::Running => "running",
            ActivityMode::Hiking => "hiking",
            ActivityMode::Default => "default",
        }
    }

    /// Detector parameters for this mode
    pub fn profile(&self) -> DetectorConfig {
        match self {
            ActivityMode::Walking => DetectorConfig::new(1.5, 400, 2000),
            ActivityMode::Running => DetectorConfig::new(2.5, 200, 1000),
            ActivityMode::Hiking => DetectorConfig::new(2.0, 500, 3000),
            ActivityMode::Default => DetectorConfig::new(1.8, 250, 2000),
        }
    }
}

impl FromStr for ActivityMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for ActivityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable detector tunables: peak threshold and step spacing bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum filtered magnitude for a peak
    pub threshold: f64,
    /// Debounce: minimum spacing between accepted steps
    pub step_timeout_ms: u64,
    /// Idle bound: silence after which walking ends and history is stale
    pub max_step_timeout_ms: u64,
}

impl DetectorConfig {
    pub const fn new(threshold: f64, step_timeout_ms: u64, max_step_timeout_ms: u64) -> Self {
        Self {
            threshold,
            step_timeout_ms,
            max_step_timeout_ms,
        }
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_millis(self.step_timeout_ms)
    }

    pub fn max_step_timeout(&self) -> Duration {
        Duration::from_millis(self.max_step_timeout_ms)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        ActivityMode::Default.profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table() {
        assert_eq!(ActivityMode::Walking.profile(), DetectorConfig::new(1.5, 400, 2000));
        assert_eq!(ActivityMode::Running.profile(), DetectorConfig::new(2.5, 200, 1000));
        assert_eq!(ActivityMode::Hiking.profile(), DetectorConfig::new(2.0, 500, 3000));
        assert_eq!(ActivityMode::Default.profile(), DetectorConfig::new(1.8, 250, 2000));
    }

    #[test]
    fn test_unknown_name_selects_default() {
        assert_eq!(ActivityMode::from_name("cycling"), ActivityMode::Default);
        assert_eq!(ActivityMode::from_name(""), ActivityMode::Default);
        assert_eq!("Running".parse::<ActivityMode>(), Ok(ActivityMode::Running));
    }

    #[test]
    fn test_name_roundtrip() {
        for mode in ActivityMode::ALL {
            assert_eq!(ActivityMode::from_name(mode.as_str()), mode);
        }
    }

    #[test]
    fn test_durations() {
        let config = ActivityMode::Running.profile();
        assert_eq!(config.step_timeout(), Duration::from_millis(200));
        assert_eq!(config.max_step_timeout(), Duration::from_millis(1000));
    }
}
