// Peak detection over the newest four filtered magnitudes
//
// The candidate is the second-newest entry: a peak is only confirmed once a
// lower sample has followed it, trading one sample of latency for noise
// robustness.

use super::history::HistoryBuffer;

/// Minimum number of history entries required for a peak test
pub const PEAK_WINDOW: usize = 4;

/// A confirmed local maximum above threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub magnitude: f64,
}

/// Strict local-maximum test on `[b-4, b-3, b-2, b-1]` with `b-2` as candidate
pub fn detect_peak(history: &HistoryBuffer, threshold: f64) -> Option<Peak> {
    let [before_before, before, candidate, current] = history.window::<PEAK_WINDOW>()?;

    let is_peak = candidate > current
        && candidate > before
        && candidate > before_before
        && candidate > threshold;

    is_peak.then_some(Peak {
        magnitude: candidate,
    })
}
