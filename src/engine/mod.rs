//! Engine module housing the step-detection core.
//!
//! This module exposes the synchronous [`StepDetector`] aggregate (`core`),
//! the sensor/clock capability traits (`backend`), and the [`StepTracker`]
//! lifecycle layer that wires a sensor source to the detector (`tracker`).

pub mod backend;
pub mod core;
pub mod tracker;

pub use backend::{
    ManualTimeSource, PermissionStatus, SampleSink, SensorSource, SimulatedSensor,
    SubscriptionHandle, SystemTimeSource, TimeSource,
};
pub use self::core::{
    DetectorPhase, DetectorStats, RejectReason, SampleOutcome, StepCallback, StepDetector,
    STEP_INCREMENT,
};
pub use tracker::StepTracker;
