//! Integration tests for the step tracker lifecycle
//!
//! A `SimulatedSensor` stands in for the platform accelerometer and a
//! `ManualTimeSource` drives the clock, so every test is deterministic:
//! - Start/stop and sensor failure reporting
//! - Unit scaling between the sensor and the detector
//! - Walking expiry observed through `stats()`
//! - Telemetry emitted along the way

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pedometer_core::analysis::GRAVITY;
use pedometer_core::config::AccelerationUnits;
use pedometer_core::engine::{ManualTimeSource, SimulatedSensor, StepCallback, StepTracker};
use pedometer_core::telemetry::TelemetryEventKind;
use pedometer_core::testing::SignalBuilder;
use pedometer_core::{ActivityMode, AppConfig, Sample, SensorError};

const INTERVAL: Duration = Duration::from_millis(50);

fn counter() -> (Arc<AtomicU32>, StepCallback) {
    let steps = Arc::new(AtomicU32::new(0));
    let sink = Arc::clone(&steps);
    let callback: StepCallback = Box::new(move |n| {
        sink.fetch_add(n, Ordering::SeqCst);
    });
    (steps, callback)
}

/// Emit each sample with the clock moved to its timestamp
fn play(sensor: &SimulatedSensor, clock: &ManualTimeSource, samples: Vec<Sample>) {
    for sample in samples {
        clock.set(sample.timestamp);
        sensor.emit(sample);
    }
}

#[test]
fn test_samples_flow_only_while_running() {
    let sensor = SimulatedSensor::new();
    let (steps, on_step) = counter();
    let mut tracker = StepTracker::new(sensor.clone(), on_step);
    let start = Instant::now();

    // Nothing is subscribed yet, so these never reach the detector
    sensor.emit_all(SignalBuilder::new(start, INTERVAL).calibration(50).build());
    assert!(!tracker.stats().is_calibrated);

    tracker.start().unwrap();
    assert!(tracker.stats().is_running);

    let builder = SignalBuilder::new(start, INTERVAL).calibration(50);
    let cursor = builder.cursor();
    sensor.emit_all(builder.build());
    assert!(tracker.stats().is_calibrated);

    tracker.set_activity_mode(ActivityMode::Default);
    sensor.emit_all(
        SignalBuilder::new(cursor, INTERVAL)
            .offsets(GRAVITY, &[0.0, 0.0, 0.0, 4.0, 0.0])
            .build(),
    );
    assert_eq!(steps.load(Ordering::SeqCst), 1);

    tracker.stop();
    sensor.emit_all(
        SignalBuilder::new(cursor + Duration::from_millis(600), INTERVAL)
            .offsets(GRAVITY, &[0.0, 0.0, 0.0, 4.0, 0.0])
            .build(),
    );
    assert_eq!(steps.load(Ordering::SeqCst), 1);

    let stats = tracker.stats();
    assert!(!stats.is_running);
    assert!(stats.is_calibrated);
}

#[test]
fn test_start_failure_leaves_tracker_stopped() {
    let (_, on_step) = counter();
    let mut tracker = StepTracker::new(SimulatedSensor::denied(), on_step);

    let err = tracker.start().unwrap_err();
    assert_eq!(err, SensorError::PermissionDenied);
    assert!(!tracker.is_running());
    assert!(!tracker.stats().is_running);
}

#[test]
fn test_standard_gravity_units_are_scaled() {
    let mut config = AppConfig::default();
    config.sensor.units = AccelerationUnits::StandardGravity;

    let sensor = SimulatedSensor::new();
    let (_, on_step) = counter();
    let mut tracker = StepTracker::with_config(sensor.clone(), &config, on_step);
    tracker.start().unwrap();

    // 1 g at rest on the z axis
    sensor.emit_all(
        SignalBuilder::new(Instant::now(), INTERVAL)
            .rest(50, 1.0)
            .build(),
    );

    let stats = tracker.stats();
    assert!(stats.is_calibrated);
    assert!((stats.baseline - config.calibration.gravity).abs() < 1e-9);
    assert_eq!(stats.threshold, 1.5);
}

#[test]
fn test_walking_expires_on_the_tracker_clock() {
    let start = Instant::now();
    let clock = Arc::new(ManualTimeSource::new(start));
    let sensor = SimulatedSensor::new();
    let (steps, on_step) = counter();
    let mut tracker =
        StepTracker::new(sensor.clone(), on_step).with_time_source(clock.clone());
    tracker.start().unwrap();

    let builder = SignalBuilder::new(start, INTERVAL).calibration(50);
    let cursor = builder.cursor();
    play(&sensor, &clock, builder.build());
    tracker.set_activity_mode(ActivityMode::Default);

    let stride = SignalBuilder::new(cursor, INTERVAL).offsets(GRAVITY, &[0.0, 0.0, 0.0, 4.0, 0.0]);
    let step_at = stride.cursor() - INTERVAL;
    play(&sensor, &clock, stride.build());
    assert_eq!(steps.load(Ordering::SeqCst), 1);
    assert!(tracker.stats().is_walking);

    // No samples arrive; only the clock moves
    clock.set(step_at + Duration::from_millis(2000));
    assert!(tracker.stats().is_walking);

    clock.set(step_at + Duration::from_millis(2001));
    let stats = tracker.stats();
    assert!(!stats.is_walking);
    assert_eq!(stats.consecutive_peaks, 0);
}

#[test]
fn test_idle_gap_discards_partial_peak() {
    let start = Instant::now();
    let clock = Arc::new(ManualTimeSource::new(start));
    let sensor = SimulatedSensor::new();
    let (steps, on_step) = counter();
    let mut tracker =
        StepTracker::new(sensor.clone(), on_step).with_time_source(clock.clone());
    tracker.start().unwrap();

    let builder = SignalBuilder::new(start, INTERVAL).calibration(50);
    let cursor = builder.cursor();
    play(&sensor, &clock, builder.build());
    tracker.set_activity_mode(ActivityMode::Default);

    // The rise happens before a long gap, the fall after it; the peak needs
    // both sides in history and the gap wipes the rise
    let samples = SignalBuilder::new(cursor, INTERVAL)
        .offsets(GRAVITY, &[0.0, 0.0, 0.0, 4.0])
        .pause(Duration::from_millis(2500))
        .offsets(GRAVITY, &[0.0])
        .build();
    play(&sensor, &clock, samples);

    assert_eq!(steps.load(Ordering::SeqCst), 0);
    assert_eq!(tracker.stats().history_length, 1);
}

#[test]
fn test_telemetry_records_lifecycle() {
    let sensor = SimulatedSensor::new();
    let (_, on_step) = counter();
    let mut tracker = StepTracker::new(sensor.clone(), on_step);
    let mut rx = tracker.telemetry().subscribe();

    tracker.start().unwrap();
    let builder = SignalBuilder::new(Instant::now(), INTERVAL)
        .rest(25, 9.0)
        .rest(25, 11.0);
    let cursor = builder.cursor();
    sensor.emit_all(builder.build());
    tracker.set_activity_mode(ActivityMode::Walking);
    sensor.emit_all(
        SignalBuilder::new(cursor, INTERVAL)
            .offsets(10.0, &[0.0, 0.0, 0.0, 4.0, 0.0])
            .build(),
    );
    tracker.reset();
    tracker.full_reset();
    tracker.stop();

    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        kinds.push(event.kind);
    }

    assert_eq!(
        kinds,
        vec![
            TelemetryEventKind::TrackerStarted,
            TelemetryEventKind::Calibrated {
                baseline: 10.0,
                threshold: 2.0
            },
            TelemetryEventKind::ActivityModeChanged {
                mode: ActivityMode::Walking
            },
            TelemetryEventKind::StepDetected {
                consecutive_peaks: 1
            },
            TelemetryEventKind::Reset { full: false },
            TelemetryEventKind::Reset { full: true },
            TelemetryEventKind::TrackerStopped,
        ]
    );

    let snapshot = tracker.telemetry().snapshot();
    assert_eq!(snapshot.total_events, 7);
    assert_eq!(snapshot.recent.first().map(|e| e.sequence), Some(0));
}
