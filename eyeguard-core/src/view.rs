//! The capability set the engine needs from whatever displays it.

use crate::error::ViewError;
use crate::step::StepKind;
use std::sync::Arc;
use std::time::Duration;

/// Push-only view collaborator.
///
/// Every call is fire-and-forget and must return quickly: implementations
/// format and hand off to their rendering surface, they never wait on it.
pub trait View: Send + Sync {
    fn notify(&self, title: &str, message: &str) -> Result<(), ViewError>;

    fn show_break_overlay(&self) -> Result<(), ViewError>;

    fn hide_break_overlay(&self) -> Result<(), ViewError>;

    fn update_break_overlay(&self, remaining: Duration, progress: f64) -> Result<(), ViewError>;

    fn update_status(
        &self,
        remaining_to_break: Duration,
        progress: f64,
        step_kind: StepKind,
    ) -> Result<(), ViewError>;

    fn update_tray(&self, tooltip: &str, step_kind: StepKind) -> Result<(), ViewError>;

    /// Reflect the protection state in the settings view.
    fn update_settings_view(&self, step_kind: StepKind) -> Result<(), ViewError>;
}

impl<V: View + ?Sized> View for Arc<V> {
    fn notify(&self, title: &str, message: &str) -> Result<(), ViewError> {
        (**self).notify(title, message)
    }

    fn show_break_overlay(&self) -> Result<(), ViewError> {
        (**self).show_break_overlay()
    }

    fn hide_break_overlay(&self) -> Result<(), ViewError> {
        (**self).hide_break_overlay()
    }

    fn update_break_overlay(&self, remaining: Duration, progress: f64) -> Result<(), ViewError> {
        (**self).update_break_overlay(remaining, progress)
    }

    fn update_status(
        &self,
        remaining_to_break: Duration,
        progress: f64,
        step_kind: StepKind,
    ) -> Result<(), ViewError> {
        (**self).update_status(remaining_to_break, progress, step_kind)
    }

    fn update_tray(&self, tooltip: &str, step_kind: StepKind) -> Result<(), ViewError> {
        (**self).update_tray(tooltip, step_kind)
    }

    fn update_settings_view(&self, step_kind: StepKind) -> Result<(), ViewError> {
        (**self).update_settings_view(step_kind)
    }
}

/// `HH:MM:SS`, hours not wrapped at 24.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
