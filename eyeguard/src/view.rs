//! Bridge from the engine thread to the terminal UI thread.

use eyeguard_core::{StepKind, View, ViewError};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Mutex};
use std::time::Duration;

/// One display change requested by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Notify { title: String, message: String },
    ShowBreak,
    HideBreak,
    BreakValues { remaining: Duration, progress: f64 },
    Status {
        remaining: Duration,
        progress: f64,
        step_kind: StepKind,
    },
    Tray { tooltip: String, step_kind: StepKind },
    SettingsView { step_kind: StepKind },
}

/// [`View`] that forwards every call as a [`ViewUpdate`] message.
///
/// Sending never blocks; the UI drains the receiver once per frame.
pub struct ChannelView {
    tx: Mutex<Sender<ViewUpdate>>,
}

impl ChannelView {
    pub fn new() -> (Self, Receiver<ViewUpdate>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx: Mutex::new(tx) }, rx)
    }

    fn send(&self, update: ViewUpdate) -> Result<(), ViewError> {
        let tx = self.tx.lock().map_err(|_| ViewError::Disconnected)?;
        tx.send(update).map_err(|_| ViewError::Disconnected)
    }
}

impl View for ChannelView {
    fn notify(&self, title: &str, message: &str) -> Result<(), ViewError> {
        self.send(ViewUpdate::Notify {
            title: title.to_string(),
            message: message.to_string(),
        })
    }

    fn show_break_overlay(&self) -> Result<(), ViewError> {
        self.send(ViewUpdate::ShowBreak)
    }

    fn hide_break_overlay(&self) -> Result<(), ViewError> {
        self.send(ViewUpdate::HideBreak)
    }

    fn update_break_overlay(&self, remaining: Duration, progress: f64) -> Result<(), ViewError> {
        self.send(ViewUpdate::BreakValues { remaining, progress })
    }

    fn update_status(
        &self,
        remaining_to_break: Duration,
        progress: f64,
        step_kind: StepKind,
    ) -> Result<(), ViewError> {
        self.send(ViewUpdate::Status {
            remaining: remaining_to_break,
            progress,
            step_kind,
        })
    }

    fn update_tray(&self, tooltip: &str, step_kind: StepKind) -> Result<(), ViewError> {
        self.send(ViewUpdate::Tray {
            tooltip: tooltip.to_string(),
            step_kind,
        })
    }

    fn update_settings_view(&self, step_kind: StepKind) -> Result<(), ViewError> {
        self.send(ViewUpdate::SettingsView { step_kind })
    }
}
