// Sensor acquisition error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Sensor error code constants
///
/// Single source of truth for the codes reported to consumers.
///
/// Error code range: 1001-1002
pub struct SensorErrorCodes {}

impl SensorErrorCodes {
    /// Access to the accelerometer was refused
    pub const PERMISSION_DENIED: i32 = 1001;

    /// No usable accelerometer could be acquired
    pub const SOURCE_UNAVAILABLE: i32 = 1002;
}

/// Log a sensor error with structured context
///
/// This function logs sensor errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_sensor_error(err: &SensorError, context: &str) {
    error!(
        "Sensor error in {}: code={}, component=StepTracker, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Sensor-related errors
///
/// Raised only by `StepTracker::start`; tracking cannot proceed without a
/// sensor, so these propagate to the caller unrecovered.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorError {
    /// Accelerometer permission denied
    PermissionDenied,

    /// Accelerometer missing or could not be acquired
    SourceUnavailable { reason: String },
}

impl ErrorCode for SensorError {
    fn code(&self) -> i32 {
        match self {
            SensorError::PermissionDenied => SensorErrorCodes::PERMISSION_DENIED,
            SensorError::SourceUnavailable { .. } => SensorErrorCodes::SOURCE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            SensorError::PermissionDenied => "Accelerometer permission denied".to_string(),
            SensorError::SourceUnavailable { reason } => {
                format!("Accelerometer not available: {}", reason)
            }
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SensorError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SensorError {}
