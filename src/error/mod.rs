// Error types for the pedometer core
//
// This module defines custom error types for sensor acquisition and
// calibration, providing structured error handling with numeric error codes
// suitable for reporting across an FFI or UI boundary.

mod calibration;
mod sensor;

pub use calibration::{log_calibration_error, CalibrationError, CalibrationErrorCodes};
pub use sensor::{log_sensor_error, SensorError, SensorErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling for
/// every consumer of the core.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
