//! Per-step durations derived from user settings and fixed constants.

use crate::settings::UserSettings;
use crate::step::StepKind;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::time::Duration;
use tracing::debug;

/// What the `off` step does with elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffPolicy {
    /// `off` never accumulates elapsed time and waits for an override.
    #[default]
    Indefinite,
    /// `off` accumulates like any other step and hands over to `working`
    /// once the suspended duration has passed.
    ResumeAfterTimeout,
}

/// Durations that are not user editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConstants {
    pub notify_1_lead: Duration,
    pub notify_2_lead: Duration,
    pub suspended_duration: Duration,
    pub off_policy: OffPolicy,
}

impl Default for SystemConstants {
    fn default() -> Self {
        Self {
            notify_1_lead: Duration::from_secs(55),
            notify_2_lead: Duration::from_secs(5),
            suspended_duration: Duration::from_secs(60 * 60),
            off_policy: OffPolicy::Indefinite,
        }
    }
}

/// Duration assigned to every [`StepKind`].
///
/// Backed by an array indexed with [`StepKind::index`]; every constructor
/// fills it through an exhaustive match so no step can be left unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDurations([Duration; StepKind::COUNT]);

impl StepDurations {
    /// Derive the table from the user settings.
    pub fn recompute(settings: &UserSettings, constants: &SystemConstants) -> Self {
        let table = Self::compute(settings.work_duration(), settings.break_duration(), constants);
        debug!(?table, "recomputed step durations");
        table
    }

    /// Derive the table from raw work and break durations.
    ///
    /// When the work duration does not exceed both leads together, the
    /// first warning is dropped (`notify_1` = 0) and `working` shrinks to
    /// whatever is left before the second warning, possibly zero.
    pub fn compute(work: Duration, brk: Duration, constants: &SystemConstants) -> Self {
        let leads = constants.notify_1_lead + constants.notify_2_lead;
        let (working, notify_1) = if work > leads {
            (work - leads, constants.notify_1_lead)
        } else {
            (work.saturating_sub(constants.notify_2_lead), Duration::ZERO)
        };

        Self(StepKind::ALL.map(|kind| match kind {
            StepKind::Working => working,
            StepKind::Notify1 => notify_1,
            StepKind::Notify2 => constants.notify_2_lead,
            StepKind::Break => brk,
            StepKind::Suspended => constants.suspended_duration,
            StepKind::Off => constants.suspended_duration,
        }))
    }

    pub fn get(&self, kind: StepKind) -> Duration {
        self.0[kind.index()]
    }

    /// Length of the work part of a cycle (`working` + both warnings).
    pub fn work_total(&self) -> Duration {
        self.get(StepKind::Working) + self.get(StepKind::Notify1) + self.get(StepKind::Notify2)
    }

    /// Length of one full automatic cycle, break included.
    pub fn cycle_total(&self) -> Duration {
        self.work_total() + self.get(StepKind::Break)
    }
}

impl Index<StepKind> for StepDurations {
    type Output = Duration;

    fn index(&self, kind: StepKind) -> &Duration {
        &self.0[kind.index()]
    }
}
