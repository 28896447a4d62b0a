use crate::config::Config;
use crate::view::ViewUpdate;
use chrono::{DateTime, Local};
use eyeguard_core::settings::DURATION_MINUTES_RANGE;
use eyeguard_core::{EngineHandle, StepKind, UserSettings};
use ratatui::layout::Rect;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tachyonfx::{fx, EffectManager, EffectTimer, Interpolation};
use tracing::{info, warn};

const TOAST_LIFETIME: Duration = Duration::from_secs(6);
const MAX_TOASTS: usize = 3;

#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub enum AppMode {
    #[default]
    Normal,
    EditingWork,
    EditingBreak,
    ShowHelp,
}

/// Last values pushed for the status window and tray.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusValues {
    pub remaining: Duration,
    pub progress: f64,
    pub step_kind: StepKind,
    pub tooltip: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakOverlay {
    pub visible: bool,
    pub remaining: Duration,
    pub progress: f64,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub shown_at: Instant,
}

pub struct App {
    pub config: Config,
    pub mode: AppMode,
    pub input_buffer: String,
    pub status: StatusValues,
    pub break_overlay: BreakOverlay,
    /// Step as last reflected in the settings view.
    pub settings_step: StepKind,
    /// Settings being edited.
    pub draft: UserSettings,
    /// Settings last handed to the engine.
    pub applied: UserSettings,
    pub next_break_at: Option<DateTime<Local>>,
    pub toasts: VecDeque<Toast>,
    pub effect_manager: EffectManager<u32>,
    pub break_fade_pending: bool,
    pub desktop_notifications: bool,
    pub should_quit: bool,
    engine: EngineHandle,
}

impl App {
    pub fn new(config: Config, engine: EngineHandle) -> Self {
        let snapshot = engine.current_snapshot();
        let settings = engine.current_settings();
        Self {
            config,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            status: StatusValues {
                remaining: snapshot.status_remaining(),
                progress: snapshot.status_progress(),
                step_kind: snapshot.step_kind,
                tooltip: snapshot.tray_tooltip(),
            },
            break_overlay: BreakOverlay::default(),
            settings_step: snapshot.step_kind,
            draft: settings,
            applied: settings,
            next_break_at: None,
            toasts: VecDeque::new(),
            effect_manager: EffectManager::default(),
            break_fade_pending: false,
            desktop_notifications: true,
            should_quit: false,
            engine,
        }
    }

    pub fn apply_update(&mut self, update: ViewUpdate) {
        match update {
            ViewUpdate::Notify { title, message } => {
                if self.desktop_notifications {
                    self.send_notification(&title, &message);
                }
                self.push_toast(title, message);
            }
            ViewUpdate::ShowBreak => {
                self.break_overlay.visible = true;
                self.break_fade_pending = true;
                if self.mode != AppMode::Normal {
                    self.mode = AppMode::Normal;
                    self.input_buffer.clear();
                }
            }
            ViewUpdate::HideBreak => self.break_overlay.visible = false,
            ViewUpdate::BreakValues {
                remaining,
                progress,
            } => {
                self.break_overlay.remaining = remaining;
                self.break_overlay.progress = progress;
            }
            ViewUpdate::Status {
                remaining,
                progress,
                step_kind,
            } => {
                self.status.remaining = remaining;
                self.status.progress = progress;
                self.status.step_kind = step_kind;
                self.next_break_at = step_kind
                    .is_work()
                    .then(|| chrono::Duration::from_std(remaining).ok())
                    .flatten()
                    .map(|left| Local::now() + left);
            }
            ViewUpdate::Tray { tooltip, step_kind } => {
                self.status.tooltip = tooltip;
                self.status.step_kind = step_kind;
            }
            ViewUpdate::SettingsView { step_kind } => {
                self.settings_step = step_kind;
                self.status.step_kind = step_kind;
            }
        }
    }

    /// Suspend or resume. Disabled while protection is off.
    pub fn toggle_protection(&mut self) {
        if self.status.step_kind == StepKind::Off {
            self.push_toast("Protection off", "Switch protection on in the settings first");
            return;
        }
        info!("user toggled protection");
        self.engine.toggle_protection();
    }

    /// Disabled while off or suspended.
    pub fn take_break_now(&mut self) {
        if matches!(self.status.step_kind, StepKind::Off | StepKind::Suspended) {
            return;
        }
        info!("user asked for a break");
        self.engine.take_break_now();
    }

    pub fn close_break_overlay(&mut self) {
        if self.break_overlay.visible {
            info!("user closed the break overlay");
            self.engine.set_step(StepKind::Working);
        }
    }

    pub fn start_editing(&mut self, mode: AppMode) {
        self.mode = mode;
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
    }

    pub fn toggle_help(&mut self) {
        self.mode = if self.mode == AppMode::ShowHelp {
            AppMode::Normal
        } else {
            AppMode::ShowHelp
        };
    }

    pub fn toggle_notifications(&mut self) {
        self.draft.notifications = self.draft.notifications.toggled();
    }

    pub fn toggle_sounds(&mut self) {
        self.draft.sounds = self.draft.sounds.toggled();
    }

    pub fn toggle_protection_status(&mut self) {
        self.draft.protection_status = self.draft.protection_status.toggled();
    }

    pub fn settings_dirty(&self) -> bool {
        self.draft != self.applied
    }

    /// Validate the draft, then persist it and apply it live.
    pub fn apply_settings(&mut self) {
        if let Err(e) = self.draft.validate() {
            self.push_toast("Settings", e.to_string());
            return;
        }
        self.engine.apply_new_settings(self.draft);
        self.applied = self.draft;
        self.push_toast("Settings", "Settings applied");
    }

    pub fn handle_char(&mut self, c: char) {
        match self.mode {
            AppMode::EditingWork | AppMode::EditingBreak => {
                if c == '\n' {
                    self.commit_input();
                } else if c.is_ascii_digit() && self.input_buffer.len() < 3 {
                    self.input_buffer.push(c);
                }
            }
            AppMode::Normal | AppMode::ShowHelp => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        if matches!(self.mode, AppMode::EditingWork | AppMode::EditingBreak) {
            self.input_buffer.pop();
        }
    }

    fn commit_input(&mut self) {
        let (field, label) = match self.mode {
            AppMode::EditingWork => (&mut self.draft.work_duration_minutes, "Work duration"),
            AppMode::EditingBreak => (&mut self.draft.break_duration_minutes, "Break duration"),
            _ => return,
        };
        match self.input_buffer.parse::<u32>() {
            Ok(minutes) if DURATION_MINUTES_RANGE.contains(&minutes) => *field = minutes,
            _ => {
                let message = format!(
                    "{} must be {}-{} minutes",
                    label,
                    DURATION_MINUTES_RANGE.start(),
                    DURATION_MINUTES_RANGE.end()
                );
                self.push_toast("Settings", message);
            }
        }
        self.input_buffer.clear();
        self.mode = AppMode::Normal;
    }

    pub fn push_toast(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.toasts.push_back(Toast {
            title: title.into(),
            message: message.into(),
            shown_at: Instant::now(),
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|toast| now.duration_since(toast.shown_at) < TOAST_LIFETIME);
    }

    fn send_notification(&self, title: &str, body: &str) {
        let mut notification = notify_rust::Notification::new();
        notification.summary(title).body(body).appname("eyeguard");
        if self.applied.sounds_enabled() {
            notification.sound_name("message-new-instant");
        }
        if let Err(e) = notification.show() {
            warn!("Failed to send notification: {}", e);
        }
    }

    pub fn trigger_break_fade(&mut self, area: Rect) {
        let timer = EffectTimer::from_ms(800, Interpolation::QuadOut);
        let effect = fx::fade_from_fg(self.config.theme.background, timer).with_area(area);
        self.effect_manager.add_effect(effect);
        self.break_fade_pending = false;
    }
}
