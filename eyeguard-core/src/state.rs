use crate::step::StepKind;
use std::time::Duration;

/// The single mutable record of the step in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentState {
    step_type: StepKind,
    step_duration: Duration,
    elapsed: Duration,
}

impl CurrentState {
    pub fn new(step_type: StepKind, step_duration: Duration) -> Self {
        Self {
            step_type,
            step_duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn step_type(&self) -> StepKind {
        self.step_type
    }

    pub fn step_duration(&self) -> Duration {
        self.step_duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Start a new step. This is the only way `elapsed` goes back to zero.
    pub fn set(&mut self, step_type: StepKind, step_duration: Duration) {
        self.step_type = step_type;
        self.step_duration = step_duration;
        self.elapsed = Duration::ZERO;
    }

    /// Replace the duration of the running step, keeping `elapsed`.
    pub fn refresh_duration(&mut self, step_duration: Duration) {
        self.step_duration = step_duration;
    }

    pub fn tick(&mut self, delta: Duration) {
        debug_assert!(!self.has_ended(), "tick after {} ended", self.step_type);
        self.elapsed += delta;
    }

    pub fn remaining(&self) -> Duration {
        self.step_duration.saturating_sub(self.elapsed)
    }

    pub fn has_ended(&self) -> bool {
        self.elapsed >= self.step_duration
    }

    /// `elapsed / duration` in `0.0..=1.0`; a zero-length step reports 1.0.
    pub fn progress(&self) -> f64 {
        if self.step_duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.step_duration.as_secs_f64()).min(1.0)
    }
}
