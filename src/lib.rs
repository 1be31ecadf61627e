// Pedometer Core - accelerometer step detection
// Adaptive calibration, noise filtering and peak/timing/pattern gating over a
// bounded history of recent samples

// Module declarations
pub mod analysis;
pub mod calibration;
pub mod config;
pub mod engine;
pub mod error;
pub mod profile;
pub mod telemetry;
pub mod testing;

// Re-exports for convenience
pub use analysis::Sample;
pub use config::AppConfig;
pub use engine::{DetectorStats, SampleOutcome, StepDetector, StepTracker};
pub use error::{ErrorCode, SensorError};
pub use profile::{ActivityMode, DetectorConfig};
