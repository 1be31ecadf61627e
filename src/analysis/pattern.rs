// PatternValidator - rejects peaks whose recent variation does not look like
// locomotion
//
// Near-flat signals (device at rest) and chaotic ones (device shaken or
// dropped) both pass a plain threshold/peak test, so the mean absolute first
// difference over the newest five entries must fall strictly inside
// (min_variation, max_variation).

use super::history::HistoryBuffer;

/// Number of history entries inspected by the validator
pub const PATTERN_WINDOW: usize = 5;

pub const DEFAULT_MIN_VARIATION: f64 = 0.3;
pub const DEFAULT_MAX_VARIATION: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct PatternValidator {
    min_variation: f64,
    max_variation: f64,
}

impl PatternValidator {
    pub fn new(min_variation: f64, max_variation: f64) -> Self {
        Self {
            min_variation,
            max_variation,
        }
    }

    /// Check whether the newest window looks like walking/running
    ///
    /// With fewer than five entries there is not enough data to judge and the
    /// pattern is accepted.
    pub fn is_valid(&self, history: &HistoryBuffer) -> bool {
        match history.window::<PATTERN_WINDOW>() {
            Some(window) => {
                let variation = average_variation(&window);
                variation > self.min_variation && variation < self.max_variation
            }
            None => true,
        }
    }
}

impl Default for PatternValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_VARIATION, DEFAULT_MAX_VARIATION)
    }
}

/// Mean absolute first difference of a window
pub fn average_variation(window: &[f64]) -> f64 {
    if window.len() < 2 {
        return 0.0;
    }

    let total: f64 = window.windows(2).map(|pair| (pair[1] - pair[0]).abs()).sum();
    total / (window.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(values: &[f64]) -> HistoryBuffer {
        let mut history = HistoryBuffer::default();
        for value in values {
            history.push(*value);
        }
        history
    }

    #[test]
    fn test_average_variation() {
        assert_eq!(average_variation(&[0.0, 1.0, 0.0, 1.0, 0.0]), 1.0);
        assert_eq!(average_variation(&[2.0]), 0.0);
    }

    #[test]
    fn test_insufficient_data_is_valid() {
        let validator = PatternValidator::default();
        assert!(validator.is_valid(&history_of(&[0.0, 0.0, 0.0, 0.0])));
    }

    #[test]
    fn test_flat_signal_rejected() {
        let validator = PatternValidator::default();
        assert!(!validator.is_valid(&history_of(&[1.0, 1.0, 1.0, 1.0, 1.0])));
        assert!(!validator.is_valid(&history_of(&[1.0, 1.1, 1.0, 1.1, 1.0])));
    }

    #[test]
    fn test_chaotic_signal_rejected() {
        let validator = PatternValidator::default();
        assert!(!validator.is_valid(&history_of(&[0.0, 20.0, 0.0, 20.0, 0.0])));
    }

    #[test]
    fn test_walking_signal_accepted() {
        let validator = PatternValidator::default();
        assert!(validator.is_valid(&history_of(&[0.2, 1.5, 3.0, 1.8, 0.6])));
    }

    #[test]
    fn test_only_newest_five_considered() {
        let validator = PatternValidator::default();
        let history = history_of(&[0.0, 40.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0]);
        assert!(validator.is_valid(&history));
    }
}
