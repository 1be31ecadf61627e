// Analysis module - per-sample signal stages of the step detector
//
// Stages, executed synchronously for every calibrated sample:
// 1. MagnitudeFilter: 3-axis sample -> gravity-free, low-pass scalar
// 2. HistoryBuffer: sliding window of the newest filtered magnitudes
// 3. detect_peak: strict local maximum above threshold (one-sample lag)
// 4. PatternValidator: rejects flat or chaotic motion
// 5. MotionState: debounce/idle timing gate and walking state machine

pub mod filter;
pub mod history;
pub mod pattern;
pub mod peak;
pub mod sample;
pub mod timing;

pub use filter::{MagnitudeFilter, GRAVITY};
pub use history::HistoryBuffer;
pub use pattern::{average_variation, PatternValidator};
pub use peak::{detect_peak, Peak};
pub use sample::Sample;
pub use timing::MotionState;
