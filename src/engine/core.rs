//! StepDetector: synchronous step-detection core.
//!
//! Every sample runs through the stages in order:
//! calibration -> magnitude filter -> history -> peak test + pattern
//! validation -> timing gate. A step fires only when all of them pass.
//!
//! The calibrated/uncalibrated and walking/idle machines are one tagged
//! [`DetectorPhase`], so motion state cannot exist before calibration.

use std::time::Instant;

use serde::Serialize;

use crate::analysis::{detect_peak, HistoryBuffer, MagnitudeFilter, MotionState, PatternValidator, Sample};
use crate::calibration::{Calibration, CalibrationProgress, Calibrator};
use crate::config::{AppConfig, CalibrationConfig};
use crate::error::log_calibration_error;
use crate::profile::{ActivityMode, DetectorConfig};

/// Increment passed to the step callback for each accepted step
pub const STEP_INCREMENT: u32 = 1;

/// Consumer callback receiving step-count increments
pub type StepCallback = Box<dyn FnMut(u32) + Send>;

/// Calibration lifecycle with the motion state it enables
#[derive(Debug, Clone)]
pub enum DetectorPhase {
    Calibrating(Calibrator),
    Tracking {
        calibration: Calibration,
        motion: MotionState,
    },
}

/// Why a confirmed peak did not become a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Inside the debounce window, or too late while walking
    Timing,
    /// Recent variation too flat or too chaotic for locomotion
    Pattern,
}

/// Decision taken for one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Non-finite input, dropped before touching any state
    Rejected,
    /// Consumed by the calibrator
    Calibrating { collected: usize, required: usize },
    /// This sample completed calibration
    Calibrated(Calibration),
    NoPeak,
    PeakRejected(RejectReason),
    Step,
}

/// Read-only snapshot of detector state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectorStats {
    pub is_calibrated: bool,
    pub threshold: f64,
    pub baseline: f64,
    pub is_walking: bool,
    pub consecutive_peaks: u32,
    pub history_length: usize,
    pub is_running: bool,
}

/// Signal stages that run once calibration is complete
#[derive(Debug, Clone)]
struct Pipeline {
    history: HistoryBuffer,
    filter: MagnitudeFilter,
    validator: PatternValidator,
}

impl Pipeline {
    fn track(
        &mut self,
        magnitude: f64,
        baseline: f64,
        now: Instant,
        config: &DetectorConfig,
        motion: &mut MotionState,
    ) -> SampleOutcome {
        let filtered = self.filter.apply(magnitude, baseline, self.history.last());
        self.history.push(filtered);

        let outcome = match detect_peak(&self.history, config.threshold) {
            None => SampleOutcome::NoPeak,
            Some(peak) => {
                let timing_ok = motion.admits_step(now, config);
                let pattern_ok = self.validator.is_valid(&self.history);

                if timing_ok && pattern_ok {
                    motion.try_step(now, config);
                    tracing::debug!(
                        "[StepDetector] Step accepted: magnitude={:.2}, consecutive={}",
                        peak.magnitude,
                        motion.consecutive_peaks()
                    );
                    SampleOutcome::Step
                } else {
                    let reason = if timing_ok {
                        RejectReason::Pattern
                    } else {
                        RejectReason::Timing
                    };
                    tracing::debug!(
                        "[StepDetector] Peak rejected: magnitude={:.2}, reason={:?}",
                        peak.magnitude,
                        reason
                    );
                    SampleOutcome::PeakRejected(reason)
                }
            }
        };

        if motion.expire(now, config) {
            tracing::debug!("[StepDetector] Walking state reset due to inactivity");
        }

        outcome
    }
}

/// Aggregate root of the detection core
///
/// Owns the calibration phase, history, tunables and the running flag. Not
/// internally synchronized: samples and control calls must be serialized by
/// the caller (see `StepTracker`).
pub struct StepDetector {
    phase: DetectorPhase,
    pipeline: Pipeline,
    config: DetectorConfig,
    mode: ActivityMode,
    calibration_config: CalibrationConfig,
    last_sample_at: Option<Instant>,
    running: bool,
    on_step: Option<StepCallback>,
}

impl StepDetector {
    /// Create a detector with default configuration and no callback
    pub fn new() -> Self {
        Self::with_config(&AppConfig::default())
    }

    /// Create a detector with explicit configuration
    pub fn with_config(config: &AppConfig) -> Self {
        let pipeline = Pipeline {
            history: HistoryBuffer::new(config.pipeline.history_capacity),
            filter: MagnitudeFilter::new(config.pipeline.filter_alpha),
            validator: PatternValidator::new(
                config.pipeline.min_pattern_variation,
                config.pipeline.max_pattern_variation,
            ),
        };

        Self {
            phase: DetectorPhase::Calibrating(Calibrator::new(config.calibration.clone())),
            pipeline,
            config: config.activity_mode.profile(),
            mode: config.activity_mode,
            calibration_config: config.calibration.clone(),
            last_sample_at: None,
            running: false,
            on_step: None,
        }
    }

    /// Register the consumer callback, replacing any previous one
    pub fn set_step_callback(&mut self, callback: StepCallback) {
        self.on_step = Some(callback);
    }

    pub fn with_step_callback(mut self, callback: StepCallback) -> Self {
        self.set_step_callback(callback);
        self
    }

    /// Run one sample through every stage
    pub fn process_sample(&mut self, sample: &Sample) -> SampleOutcome {
        if !sample.is_finite() {
            tracing::debug!("[StepDetector] Dropping sample with non-finite magnitude {:?}", sample);
            return SampleOutcome::Rejected;
        }

        let now = sample.timestamp;
        if let Some(previous) = self.last_sample_at {
            if now.saturating_duration_since(previous) > self.config.max_step_timeout() {
                tracing::debug!("[StepDetector] Idle gap detected, clearing history");
                self.pipeline.history.clear();
            }
        }
        self.last_sample_at = Some(now);

        let magnitude = sample.magnitude();
        let outcome = match &mut self.phase {
            DetectorPhase::Calibrating(calibrator) => match calibrator.add_sample(magnitude) {
                Ok(CalibrationProgress::Collecting {
                    collected,
                    required,
                }) => SampleOutcome::Calibrating {
                    collected,
                    required,
                },
                Ok(CalibrationProgress::Complete(calibration)) => {
                    SampleOutcome::Calibrated(calibration)
                }
                Err(err) => {
                    log_calibration_error(&err, "process_sample");
                    SampleOutcome::Calibrating {
                        collected: calibrator.collected(),
                        required: calibrator.required(),
                    }
                }
            },
            DetectorPhase::Tracking {
                calibration,
                motion,
            } => self
                .pipeline
                .track(magnitude, calibration.baseline, now, &self.config, motion),
        };

        match outcome {
            SampleOutcome::Calibrated(calibration) => self.complete_calibration(calibration),
            SampleOutcome::Step => {
                if let Some(callback) = self.on_step.as_mut() {
                    callback(STEP_INCREMENT);
                }
            }
            _ => {}
        }

        outcome
    }

    fn complete_calibration(&mut self, calibration: Calibration) {
        self.config.threshold = calibration.threshold;
        self.phase = DetectorPhase::Tracking {
            calibration,
            motion: MotionState::default(),
        };
        tracing::info!(
            "[StepDetector] Calibrated: baseline={:.2}, threshold={:.2}",
            calibration.baseline,
            calibration.threshold
        );
    }

    /// Apply an activity profile (threshold and timeouts only)
    pub fn set_activity_mode(&mut self, mode: ActivityMode) {
        self.mode = mode;
        self.config = mode.profile();
    }

    /// Clear history and motion state; calibration and tunables are kept
    pub fn reset(&mut self) {
        self.pipeline.history.clear();
        self.last_sample_at = None;
        if let DetectorPhase::Tracking { motion, .. } = &mut self.phase {
            *motion = MotionState::default();
        }
    }

    /// `reset` plus discarding calibration; the next samples recalibrate
    pub fn full_reset(&mut self) {
        self.reset();
        self.phase = DetectorPhase::Calibrating(Calibrator::new(self.calibration_config.clone()));
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> &DetectorPhase {
        &self.phase
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn activity_mode(&self) -> ActivityMode {
        self.mode
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        match &self.phase {
            DetectorPhase::Tracking { calibration, .. } => Some(calibration),
            DetectorPhase::Calibrating(_) => None,
        }
    }

    pub fn motion(&self) -> Option<&MotionState> {
        match &self.phase {
            DetectorPhase::Tracking { motion, .. } => Some(motion),
            DetectorPhase::Calibrating(_) => None,
        }
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.pipeline.history
    }

    /// Snapshot of current state as last updated by a sample
    pub fn stats(&self) -> DetectorStats {
        self.snapshot(self.motion().copied())
    }

    /// Snapshot with walking expiry evaluated at `now`, without mutating
    pub fn stats_at(&self, now: Instant) -> DetectorStats {
        self.snapshot(self.motion().map(|motion| motion.projected(now, &self.config)))
    }

    fn snapshot(&self, motion: Option<MotionState>) -> DetectorStats {
        let motion = motion.unwrap_or_default();
        DetectorStats {
            is_calibrated: self.calibration().is_some(),
            threshold: self.config.threshold,
            baseline: self
                .calibration()
                .map_or(self.calibration_config.gravity, |c| c.baseline),
            is_walking: motion.is_walking(),
            consecutive_peaks: motion.consecutive_peaks(),
            history_length: self.pipeline.history.len(),
            is_running: self.running,
        }
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "core_tests.rs"]
mod tests;
