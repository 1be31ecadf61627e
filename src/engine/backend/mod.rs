//! Backend abstractions for sensor sources and clocks.
//!
//! Device acquisition and permission prompts are environment specific and
//! frequently asynchronous. The tracker only needs their outcome, so they sit
//! behind the small [`SensorSource`] capability trait and the algorithmic core
//! stays synchronous and testable without hardware.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::analysis::Sample;

mod simulated;
pub use simulated::SimulatedSensor;

/// Result of asking the platform for accelerometer access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Opaque handle identifying one sample subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Per-sample callback installed by the tracker
pub type SampleSink = Box<dyn FnMut(Sample) + Send>;

/// Trait implemented by platform accelerometer sources.
///
/// Samples are pushed one at a time into the subscribed sink and each must be
/// processed to completion before the next is delivered.
pub trait SensorSource {
    fn request_permission(&mut self) -> PermissionStatus;
    fn is_available(&self) -> bool;
    fn set_sample_interval(&mut self, interval: Duration);
    fn subscribe(&mut self, sink: SampleSink) -> SubscriptionHandle;
    fn unsubscribe(&mut self, handle: SubscriptionHandle);
}

/// Trait representing a monotonic time source.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Instant;
}

/// Default time source backed by `Instant::now`.
#[derive(Default)]
pub struct SystemTimeSource {
    _unit: (),
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually driven clock for deterministic runs.
pub struct ManualTimeSource {
    now: Mutex<Instant>,
}

impl ManualTimeSource {
    pub fn new(start: Instant) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: Instant) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
