// Calibrator - one-shot collection of resting magnitudes
//
// Every sample delivered before calibration completes is consumed here and
// produces no step decision. When the target count is reached the collected
// magnitudes are reduced to a Calibration and discarded.

use crate::calibration::state::Calibration;
use crate::config::CalibrationConfig;
use crate::error::CalibrationError;

/// Outcome of feeding one magnitude to the calibrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationProgress {
    /// Still collecting
    Collecting { collected: usize, required: usize },
    /// Target reached, calibration computed
    Complete(Calibration),
}

/// Collects raw magnitudes until the configured target is reached
#[derive(Debug, Clone)]
pub struct Calibrator {
    magnitudes: Vec<f64>,
    required: usize,
    config: CalibrationConfig,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        let required = config.sample_count.max(1);
        Self {
            magnitudes: Vec::with_capacity(required),
            required,
            config,
        }
    }

    pub fn collected(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn required(&self) -> usize {
        self.required
    }

    /// Add a raw magnitude
    ///
    /// # Returns
    /// * `Ok(Collecting)` - More samples needed
    /// * `Ok(Complete)` - Calibration finished; the raw magnitudes are released
    /// * `Err(CalibrationError)` - The collected data could not be reduced; the
    ///   collection is cleared so a fresh pass can start
    pub fn add_sample(&mut self, magnitude: f64) -> Result<CalibrationProgress, CalibrationError> {
        self.magnitudes.push(magnitude);

        if self.magnitudes.len() < self.required {
            return Ok(CalibrationProgress::Collecting {
                collected: self.magnitudes.len(),
                required: self.required,
            });
        }

        let magnitudes = std::mem::take(&mut self.magnitudes);
        Calibration::from_magnitudes(&magnitudes, &self.config).map(CalibrationProgress::Complete)
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}
