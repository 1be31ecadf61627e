use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::analysis::Sample;

use super::{PermissionStatus, SampleSink, SensorSource, SubscriptionHandle};

/// Simulated accelerometer used for deterministic testing and CLI tooling.
///
/// Clones share one device: hand one clone to the tracker and keep another
/// to push samples with [`SimulatedSensor::emit`].
#[derive(Clone, Default)]
pub struct SimulatedSensor {
    inner: Arc<Mutex<SimulatedInner>>,
}

#[derive(Default)]
struct SimulatedInner {
    permission_denied: bool,
    unavailable: bool,
    sample_interval: Option<Duration>,
    next_id: u64,
    sinks: Vec<(SubscriptionHandle, SampleSink)>,
}

impl SimulatedSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensor whose permission prompt is always refused
    pub fn denied() -> Self {
        let sensor = Self::new();
        sensor.lock().permission_denied = true;
        sensor
    }

    /// Sensor reporting no accelerometer hardware
    pub fn unavailable() -> Self {
        let sensor = Self::new();
        sensor.lock().unavailable = true;
        sensor
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver one sample to every subscriber, in subscription order
    pub fn emit(&self, sample: Sample) {
        let mut inner = self.lock();
        for (_, sink) in inner.sinks.iter_mut() {
            sink(sample);
        }
    }

    pub fn emit_all<I: IntoIterator<Item = Sample>>(&self, samples: I) {
        for sample in samples {
            self.emit(sample);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().sinks.len()
    }

    /// Interval most recently requested via `set_sample_interval`
    pub fn sample_interval(&self) -> Option<Duration> {
        self.lock().sample_interval
    }
}

impl SensorSource for SimulatedSensor {
    fn request_permission(&mut self) -> PermissionStatus {
        if self.lock().permission_denied {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        }
    }

    fn is_available(&self) -> bool {
        !self.lock().unavailable
    }

    fn set_sample_interval(&mut self, interval: Duration) {
        self.lock().sample_interval = Some(interval);
    }

    fn subscribe(&mut self, sink: SampleSink) -> SubscriptionHandle {
        let mut inner = self.lock();
        let handle = SubscriptionHandle::new(inner.next_id);
        inner.next_id += 1;
        inner.sinks.push((handle, sink));
        handle
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.lock().sinks.retain(|(id, _)| *id != handle);
    }
}
