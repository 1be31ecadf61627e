// MagnitudeFilter - gravity removal and first-order low-pass smoothing
//
// Algorithm:
// 1. denoised = |raw_magnitude - baseline|
// 2. filtered = previous + alpha * (denoised - previous)
//
// `previous` is the newest history entry. With an empty history the filter
// has no memory and passes the denoised value straight through.

/// Standard gravity in m/s², the resting magnitude assumed before calibration
pub const GRAVITY: f64 = 9.81;

/// Default smoothing factor (higher = more weight on the newest sample)
pub const DEFAULT_ALPHA: f64 = 0.8;

#[derive(Debug, Clone, Copy)]
pub struct MagnitudeFilter {
    alpha: f64,
}

impl MagnitudeFilter {
    /// Create a filter with the given smoothing factor
    ///
    /// Alpha is clamped into (0, 1]; zero would freeze the signal.
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() && alpha > 0.0 {
            alpha.min(1.0)
        } else {
            DEFAULT_ALPHA
        };
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Remove the gravity baseline from a raw magnitude
    pub fn denoise(&self, raw_magnitude: f64, baseline: f64) -> f64 {
        (raw_magnitude - baseline).abs()
    }

    /// Apply the exponential low-pass step against the previous filtered value
    pub fn smooth(&self, denoised: f64, previous: Option<f64>) -> f64 {
        match previous {
            Some(previous) => previous + self.alpha * (denoised - previous),
            None => denoised,
        }
    }

    /// Denoise and smooth in one step
    pub fn apply(&self, raw_magnitude: f64, baseline: f64, previous: Option<f64>) -> f64 {
        self.smooth(self.denoise(raw_magnitude, baseline), previous)
    }
}

impl Default for MagnitudeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denoise_is_absolute_deviation() {
        let filter = MagnitudeFilter::default();
        assert_eq!(filter.denoise(12.0, 10.0), 2.0);
        assert_eq!(filter.denoise(8.0, 10.0), 2.0);
    }

    #[test]
    fn test_no_memory_at_boundary() {
        let filter = MagnitudeFilter::default();
        assert_eq!(filter.smooth(3.0, None), 3.0);
    }

    #[test]
    fn test_smoothing_weights_newest_sample() {
        let filter = MagnitudeFilter::default();
        // 1.0 + 0.8 * (3.0 - 1.0)
        let filtered = filter.smooth(3.0, Some(1.0));
        assert!((filtered - 2.6).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_alpha_falls_back_to_default() {
        assert_eq!(MagnitudeFilter::new(0.0).alpha(), DEFAULT_ALPHA);
        assert_eq!(MagnitudeFilter::new(f64::NAN).alpha(), DEFAULT_ALPHA);
        assert_eq!(MagnitudeFilter::new(4.0).alpha(), 1.0);
    }
}
