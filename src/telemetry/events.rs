//! Telemetry event types describing tracker lifecycle and detection output.

use serde::{Deserialize, Serialize};

use crate::profile::ActivityMode;

/// Event published by the step tracker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelemetryEvent {
    /// Monotonic sequence number assigned by the collector
    pub sequence: u64,
    pub kind: TelemetryEventKind,
}

/// Kinds of telemetry events supported by the tracker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum TelemetryEventKind {
    TrackerStarted,
    TrackerStopped,
    Calibrated { baseline: f64, threshold: f64 },
    StepDetected { consecutive_peaks: u32 },
    ActivityModeChanged { mode: ActivityMode },
    Reset { full: bool },
    SensorFailure { code: i32 },
}
