// Calibration module - device noise baseline and adaptive threshold
//
// This module provides two main components:
// 1. Calibrator: collects the first N raw magnitudes (default 50)
// 2. Calibration: the frozen baseline/std-dev/threshold computed from them
//
// The calibration workflow:
// 1. Create Calibrator from CalibrationConfig
// 2. Feed raw magnitudes until CalibrationProgress::Complete
// 3. Keep the Calibration until a full reset

pub mod procedure;
pub mod state;

pub use procedure::{CalibrationProgress, Calibrator};
pub use state::Calibration;
