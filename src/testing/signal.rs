//! Deterministic synthetic accelerometer signals.
//!
//! `SignalBuilder` lays samples out on a fixed-interval timeline. All
//! acceleration is placed on the z axis, so a sample's magnitude equals the
//! requested value (plus optional seeded jitter).

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::PI;
use std::time::{Duration, Instant};

use crate::analysis::{Sample, GRAVITY};

/// Nominal device sample interval (~60 Hz)
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(16);

pub struct SignalBuilder {
    cursor: Instant,
    interval: Duration,
    samples: Vec<Sample>,
    jitter: Option<(f64, StdRng)>,
}

impl SignalBuilder {
    pub fn new(start: Instant, interval: Duration) -> Self {
        Self {
            cursor: start,
            interval,
            samples: Vec::new(),
            jitter: None,
        }
    }

    /// Add uniform noise in `[-amplitude, amplitude]` to subsequent samples
    pub fn jitter(mut self, amplitude: f64, seed: u64) -> Self {
        self.jitter = (amplitude > 0.0).then(|| (amplitude, StdRng::seed_from_u64(seed)));
        self
    }

    /// One sample of the given magnitude at the cursor
    pub fn value(mut self, magnitude: f64) -> Self {
        let magnitude = match self.jitter.as_mut() {
            Some((amplitude, rng)) => magnitude + rng.gen_range(-*amplitude..=*amplitude),
            None => magnitude,
        };
        self.samples.push(Sample::new(0.0, 0.0, magnitude, self.cursor));
        self.cursor += self.interval;
        self
    }

    /// Consecutive samples of the given magnitudes
    pub fn values(self, magnitudes: &[f64]) -> Self {
        magnitudes.iter().fold(self, |builder, m| builder.value(*m))
    }

    /// Consecutive samples offset from `baseline` by `offsets`
    pub fn offsets(self, baseline: f64, offsets: &[f64]) -> Self {
        offsets.iter().fold(self, |builder, o| builder.value(baseline + o))
    }

    /// `count` samples at a constant magnitude
    pub fn rest(self, count: usize, magnitude: f64) -> Self {
        (0..count).fold(self, |builder, _| builder.value(magnitude))
    }

    /// The standard resting calibration pass: `count` samples of pure gravity
    pub fn calibration(self, count: usize) -> Self {
        self.rest(count, GRAVITY)
    }

    /// Raised-cosine gait: magnitude swings between `baseline` and
    /// `baseline + amplitude` once per `period`, for `duration`
    pub fn gait(mut self, duration: Duration, period: Duration, amplitude: f64, baseline: f64) -> Self {
        let start = self.cursor;
        let period_ms = period.as_secs_f64() * 1000.0;
        while self.cursor.saturating_duration_since(start) < duration {
            let elapsed_ms = self.cursor.saturating_duration_since(start).as_secs_f64() * 1000.0;
            let phase = elapsed_ms / period_ms;
            let magnitude = baseline + amplitude / 2.0 * (1.0 - (2.0 * PI * phase).cos());
            self = self.value(magnitude);
        }
        self
    }

    /// Advance the timeline without emitting samples
    pub fn pause(mut self, gap: Duration) -> Self {
        self.cursor += gap;
        self
    }

    /// Timestamp the next sample will carry
    pub fn cursor(&self) -> Instant {
        self.cursor
    }

    pub fn build(self) -> Vec<Sample> {
        self.samples
    }
}
