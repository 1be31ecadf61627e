// Timing gate and motion state machine
//
// States:
// - Idle { last_step: None }   never stepped
// - Idle { last_step: Some }   stepped before, silent for > max_step_timeout
// - Walking                    a step was accepted within max_step_timeout
//
// A confirmed peak becomes a step iff
//   delta > step_timeout && (delta < max_step_timeout || first step || idle)
// so the upper bound never blocks resuming cadence after a pause.

use std::time::{Duration, Instant};

use crate::profile::DetectorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Idle {
        last_step: Option<Instant>,
    },
    Walking {
        last_step: Instant,
        consecutive_peaks: u32,
    },
}

impl MotionState {
    pub fn is_walking(&self) -> bool {
        matches!(self, MotionState::Walking { .. })
    }

    pub fn last_step(&self) -> Option<Instant> {
        match self {
            MotionState::Idle { last_step } => *last_step,
            MotionState::Walking { last_step, .. } => Some(*last_step),
        }
    }

    /// Accepted steps since the last transition to idle
    pub fn consecutive_peaks(&self) -> u32 {
        match self {
            MotionState::Idle { .. } => 0,
            MotionState::Walking {
                consecutive_peaks, ..
            } => *consecutive_peaks,
        }
    }

    /// Time since the last accepted step, `None` before the first step
    pub fn since_last_step(&self, now: Instant) -> Option<Duration> {
        self.last_step()
            .map(|last_step| now.saturating_duration_since(last_step))
    }

    /// Timing-gate verdict for a peak observed at `now`
    pub fn admits_step(&self, now: Instant, config: &DetectorConfig) -> bool {
        match (self, self.since_last_step(now)) {
            (_, None) => true,
            (MotionState::Idle { .. }, Some(delta)) => delta > config.step_timeout(),
            (MotionState::Walking { .. }, Some(delta)) => {
                delta > config.step_timeout() && delta < config.max_step_timeout()
            }
        }
    }

    /// Run the timing gate and, on acceptance, transition to walking
    ///
    /// Returns true when the step was accepted.
    pub fn try_step(&mut self, now: Instant, config: &DetectorConfig) -> bool {
        if !self.admits_step(now, config) {
            return false;
        }

        *self = MotionState::Walking {
            last_step: now,
            consecutive_peaks: self.consecutive_peaks().saturating_add(1),
        };
        true
    }

    /// Walking -> Idle once more than `max_step_timeout` has passed without a step
    ///
    /// Returns true when the transition happened.
    pub fn expire(&mut self, now: Instant, config: &DetectorConfig) -> bool {
        if let MotionState::Walking { last_step, .. } = *self {
            if now.saturating_duration_since(last_step) > config.max_step_timeout() {
                *self = MotionState::Idle {
                    last_step: Some(last_step),
                };
                return true;
            }
        }
        false
    }

    /// The state as it would read at `now`, applying walking expiry without
    /// mutating `self`
    pub fn projected(&self, now: Instant, config: &DetectorConfig) -> MotionState {
        let mut projected = *self;
        projected.expire(now, config);
        projected
    }
}

impl Default for MotionState {
    fn default() -> Self {
        MotionState::Idle { last_step: None }
    }
}
