//! Per-tick snapshots and the observers that consume them.
//!
//! The engine advances time on its own; after each wait-loop iteration it
//! hands a [`Snapshot`] to every [`TickObserver`]. Refreshing the view is
//! just one observer, so its cadence can change without touching timing.

use crate::durations::StepDurations;
use crate::state::CurrentState;
use crate::step::StepKind;
use crate::view::{format_hms, View};
use serde::Serialize;
use std::time::Duration;
use tracing::{trace, warn};

/// Read-only picture of the engine at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub step_kind: StepKind,
    pub elapsed: Duration,
    pub step_duration: Duration,
    /// Time left in the current step.
    pub remaining: Duration,
    /// `elapsed / step_duration` of the current step.
    pub progress: f64,
    /// Time left until the break starts; zero outside the work steps.
    pub remaining_to_break: Duration,
    /// Length of the whole work part of the cycle.
    pub work_total: Duration,
}

impl Snapshot {
    pub fn capture(state: &CurrentState, durations: &StepDurations) -> Self {
        let remaining = state.remaining();
        let remaining_to_break = match state.step_type() {
            StepKind::Working => {
                remaining + durations[StepKind::Notify1] + durations[StepKind::Notify2]
            }
            StepKind::Notify1 => remaining + durations[StepKind::Notify2],
            StepKind::Notify2 => remaining,
            StepKind::Break | StepKind::Suspended | StepKind::Off => Duration::ZERO,
        };
        Self {
            step_kind: state.step_type(),
            elapsed: state.elapsed(),
            step_duration: state.step_duration(),
            remaining,
            progress: state.progress(),
            remaining_to_break,
            work_total: durations.work_total(),
        }
    }

    /// Time shown in the status window: until the break while working,
    /// until the step ends otherwise. `off` has no end and shows zero.
    pub fn status_remaining(&self) -> Duration {
        match self.step_kind {
            kind if kind.is_work() => self.remaining_to_break,
            StepKind::Off => Duration::ZERO,
            _ => self.remaining,
        }
    }

    pub fn status_progress(&self) -> f64 {
        match self.step_kind {
            kind if kind.is_work() => {
                if self.work_total.is_zero() {
                    0.0
                } else {
                    let left = self.remaining_to_break.as_secs_f64() / self.work_total.as_secs_f64();
                    (1.0 - left).clamp(0.0, 1.0)
                }
            }
            StepKind::Off => 0.0,
            _ => self.progress,
        }
    }

    pub fn tray_tooltip(&self) -> String {
        match self.step_kind {
            StepKind::Off => "Protection off".to_string(),
            StepKind::Suspended => {
                format!("Protection suspended: {} left", format_hms(self.remaining))
            }
            StepKind::Break => format!("Break: {} left", format_hms(self.remaining)),
            _ => format!("Time until break: {}", format_hms(self.remaining_to_break)),
        }
    }
}

pub trait TickObserver: Send {
    fn on_tick(&mut self, snapshot: &Snapshot);
}

/// Pushes snapshots to a [`View`].
///
/// Break-overlay values go out on every tick; status and tray values go
/// out every `every` ticks.
pub struct ViewRefresher<V> {
    view: V,
    every: u32,
    ticks: u32,
}

impl<V: View> ViewRefresher<V> {
    pub fn new(view: V) -> Self {
        Self::with_cadence(view, 1)
    }

    pub fn with_cadence(view: V, every: u32) -> Self {
        Self {
            view,
            every: every.max(1),
            ticks: 0,
        }
    }
}

impl<V: View> TickObserver for ViewRefresher<V> {
    fn on_tick(&mut self, snapshot: &Snapshot) {
        trace!(step = %snapshot.step_kind, remaining = ?snapshot.remaining, "tick");
        let due = self.ticks % self.every == 0;
        self.ticks = self.ticks.wrapping_add(1);

        let result = if snapshot.step_kind == StepKind::Break {
            self.view
                .update_break_overlay(snapshot.remaining, snapshot.progress)
        } else if due {
            self.view
                .update_status(
                    snapshot.status_remaining(),
                    snapshot.status_progress(),
                    snapshot.step_kind,
                )
                .and_then(|()| {
                    self.view
                        .update_tray(&snapshot.tray_tooltip(), snapshot.step_kind)
                })
        } else {
            Ok(())
        };

        if let Err(e) = result {
            warn!("view refresh failed: {}", e);
        }
    }
}
