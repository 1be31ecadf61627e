// Calibration - frozen noise baseline and adaptive trigger threshold
//
// Computed once from the raw magnitudes collected by the Calibrator:
// - baseline  = mean(magnitudes)
// - std_dev   = population standard deviation of magnitudes
// - threshold = max(min_threshold, std_dev_multiplier * std_dev)
//
// The result is read-only until a full reset discards it.

use crate::config::CalibrationConfig;
use crate::error::CalibrationError;

/// Result of a completed calibration
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Calibration {
    /// Resting (gravity-only) magnitude
    pub baseline: f64,
    /// Population standard deviation of the calibration magnitudes
    pub std_dev: f64,
    /// Peak threshold derived from device noise
    pub threshold: f64,
    /// Number of magnitudes the result was computed from
    pub sample_count: usize,
}

impl Calibration {
    /// Compute a calibration from raw magnitudes
    ///
    /// # Returns
    /// * `Ok(Calibration)` - Baseline, noise and threshold for the device
    /// * `Err(CalibrationError)` - No magnitudes, or a non-finite magnitude
    pub fn from_magnitudes(
        magnitudes: &[f64],
        config: &CalibrationConfig,
    ) -> Result<Self, CalibrationError> {
        if magnitudes.is_empty() {
            return Err(CalibrationError::InsufficientSamples {
                required: config.sample_count.max(1),
                collected: 0,
            });
        }

        if let Some(index) = magnitudes.iter().position(|m| !m.is_finite()) {
            return Err(CalibrationError::InvalidSamples {
                reason: format!("magnitude {} is not finite", index),
            });
        }

        let count = magnitudes.len() as f64;
        let baseline = magnitudes.iter().sum::<f64>() / count;
        let variance = magnitudes
            .iter()
            .map(|m| (m - baseline).powi(2))
            .sum::<f64>()
            / count;
        let std_dev = variance.sqrt();

        if !baseline.is_finite() || !std_dev.is_finite() {
            return Err(CalibrationError::InvalidSamples {
                reason: "magnitude statistics overflowed".to_string(),
            });
        }

        Ok(Self {
            baseline,
            std_dev,
            threshold: config.min_threshold.max(std_dev * config.std_dev_multiplier),
            sample_count: magnitudes.len(),
        })
    }
}
