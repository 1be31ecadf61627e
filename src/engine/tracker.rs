//! StepTracker: sensor lifecycle around the synchronous [`StepDetector`].
//!
//! The detector sits behind a single `Mutex` shared with the sample sink, so
//! samples and control calls are serialized even when a platform delivers
//! samples on its own thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info};

use crate::analysis::Sample;
use crate::config::{AccelerationUnits, AppConfig};
use crate::engine::backend::{
    PermissionStatus, SensorSource, SubscriptionHandle, SystemTimeSource, TimeSource,
};
use crate::engine::core::{DetectorStats, SampleOutcome, StepCallback, StepDetector};
use crate::error::{log_sensor_error, ErrorCode, SensorError};
use crate::profile::ActivityMode;
use crate::telemetry::{TelemetryCollector, TelemetryEventKind};

pub struct StepTracker<S: SensorSource> {
    source: S,
    detector: Arc<Mutex<StepDetector>>,
    telemetry: Arc<TelemetryCollector>,
    time_source: Arc<dyn TimeSource>,
    subscription: Option<SubscriptionHandle>,
    sample_interval: Duration,
    unit_scale: f64,
}

impl<S: SensorSource> StepTracker<S> {
    /// Create a tracker with default configuration
    ///
    /// `on_step` runs while the detector lock is held and must not call back
    /// into the tracker.
    pub fn new(source: S, on_step: StepCallback) -> Self {
        Self::with_config(source, &AppConfig::default(), on_step)
    }

    pub fn with_config(source: S, config: &AppConfig, on_step: StepCallback) -> Self {
        let detector = StepDetector::with_config(config).with_step_callback(on_step);
        let unit_scale = match config.sensor.units {
            AccelerationUnits::MetersPerSecondSquared => 1.0,
            AccelerationUnits::StandardGravity => config.calibration.gravity,
        };

        Self {
            source,
            detector: Arc::new(Mutex::new(detector)),
            telemetry: Arc::new(TelemetryCollector::default()),
            time_source: Arc::new(SystemTimeSource::default()),
            subscription: None,
            sample_interval: Duration::from_millis(config.sensor.sample_interval_ms),
            unit_scale,
        }
    }

    /// Replace the clock used to project walking expiry in [`Self::stats`]
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    fn lock_detector(&self) -> MutexGuard<'_, StepDetector> {
        self.detector.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    /// Acquire the sensor and begin processing samples
    ///
    /// # Returns
    /// * `Ok(())` - Tracking started, or was already running
    /// * `Err(SensorError)` - Permission refused or no usable accelerometer
    pub fn start(&mut self) -> Result<(), SensorError> {
        if self.is_running() {
            info!("Step tracker already running");
            return Ok(());
        }

        if self.source.request_permission() == PermissionStatus::Denied {
            return Err(self.fail(SensorError::PermissionDenied));
        }

        if !self.source.is_available() {
            return Err(self.fail(SensorError::SourceUnavailable {
                reason: "accelerometer not available on this device".to_string(),
            }));
        }

        self.source.set_sample_interval(self.sample_interval);

        let detector = Arc::clone(&self.detector);
        let telemetry = Arc::clone(&self.telemetry);
        let unit_scale = self.unit_scale;
        let handle = self.source.subscribe(Box::new(move |sample: Sample| {
            let mut detector = detector.lock().unwrap_or_else(PoisonError::into_inner);
            let outcome = detector.process_sample(&sample.scaled(unit_scale));
            match outcome {
                SampleOutcome::Step => {
                    let consecutive_peaks = detector
                        .motion()
                        .map_or(0, |motion| motion.consecutive_peaks());
                    telemetry.publish(TelemetryEventKind::StepDetected { consecutive_peaks });
                }
                SampleOutcome::Calibrated(calibration) => {
                    telemetry.publish(TelemetryEventKind::Calibrated {
                        baseline: calibration.baseline,
                        threshold: calibration.threshold,
                    });
                }
                _ => {}
            }
        }));

        self.subscription = Some(handle);
        self.lock_detector().set_running(true);
        self.telemetry.publish(TelemetryEventKind::TrackerStarted);
        info!(
            "Step tracker started (interval={}ms)",
            self.sample_interval.as_millis()
        );
        Ok(())
    }

    fn fail(&self, err: SensorError) -> SensorError {
        log_sensor_error(&err, "start");
        self.telemetry
            .publish(TelemetryEventKind::SensorFailure { code: err.code() });
        err
    }

    /// Detach from the sensor; detector state is preserved
    pub fn stop(&mut self) {
        let Some(handle) = self.subscription.take() else {
            debug!("Step tracker already stopped");
            return;
        };

        self.source.unsubscribe(handle);
        self.lock_detector().set_running(false);
        self.telemetry.publish(TelemetryEventKind::TrackerStopped);
        info!("Step tracker stopped");
    }

    pub fn set_activity_mode(&self, mode: ActivityMode) {
        self.lock_detector().set_activity_mode(mode);
        self.telemetry
            .publish(TelemetryEventKind::ActivityModeChanged { mode });
        info!("Activity mode set to {}", mode);
    }

    /// Clear motion state and history, keeping calibration
    pub fn reset(&self) {
        self.lock_detector().reset();
        self.telemetry
            .publish(TelemetryEventKind::Reset { full: false });
    }

    /// Clear everything including calibration
    pub fn full_reset(&self) {
        self.lock_detector().full_reset();
        self.telemetry.publish(TelemetryEventKind::Reset { full: true });
    }

    /// Snapshot with walking expiry evaluated against the tracker clock
    pub fn stats(&self) -> DetectorStats {
        let now = self.time_source.now();
        self.lock_detector().stats_at(now)
    }

    pub fn telemetry(&self) -> &TelemetryCollector {
        &self.telemetry
    }
}

impl<S: SensorSource> Drop for StepTracker<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::backend::SimulatedSensor;

    fn noop() -> StepCallback {
        Box::new(|_| {})
    }

    #[test]
    fn test_start_is_idempotent() {
        let sensor = SimulatedSensor::new();
        let mut tracker = StepTracker::new(sensor.clone(), noop());

        tracker.start().unwrap();
        tracker.start().unwrap();
        assert!(tracker.is_running());
        assert_eq!(sensor.subscriber_count(), 1);
        assert_eq!(sensor.sample_interval(), Some(Duration::from_millis(16)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let sensor = SimulatedSensor::new();
        let mut tracker = StepTracker::new(sensor.clone(), noop());

        tracker.stop();
        tracker.start().unwrap();
        tracker.stop();
        tracker.stop();
        assert!(!tracker.is_running());
        assert!(!tracker.stats().is_running);
        assert_eq!(sensor.subscriber_count(), 0);
    }

    #[test]
    fn test_permission_denied() {
        let mut tracker = StepTracker::new(SimulatedSensor::denied(), noop());
        assert_eq!(tracker.start(), Err(SensorError::PermissionDenied));
        assert!(!tracker.is_running());

        let snapshot = tracker.telemetry().snapshot();
        assert_eq!(
            snapshot.recent.last().map(|e| e.kind.clone()),
            Some(TelemetryEventKind::SensorFailure { code: 1001 })
        );
    }

    #[test]
    fn test_source_unavailable() {
        let mut tracker = StepTracker::new(SimulatedSensor::unavailable(), noop());
        assert!(matches!(
            tracker.start(),
            Err(SensorError::SourceUnavailable { .. })
        ));
        assert!(!tracker.is_running());
    }

    #[test]
    fn test_drop_detaches_sensor() {
        let sensor = SimulatedSensor::new();
        {
            let mut tracker = StepTracker::new(sensor.clone(), noop());
            tracker.start().unwrap();
            assert_eq!(sensor.subscriber_count(), 1);
        }
        assert_eq!(sensor.subscriber_count(), 0);
    }
}
