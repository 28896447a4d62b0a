#![allow(dead_code)]

use eyeguard_core::{
    Clock, Engine, SettingsError, SettingsStore, Snapshot, StepKind, SystemConstants,
    TickObserver, UserSettings, View, ViewError,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Counts requested sleeps instead of blocking (optionally blocks a little
/// so a spawned engine does not spin).
#[derive(Clone, Default)]
pub struct ManualClock {
    slept_ms: Arc<AtomicU64>,
    real_delay: Option<Duration>,
}

impl ManualClock {
    pub fn with_real_delay(delay: Duration) -> Self {
        Self {
            real_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn slept(&self) -> Duration {
        Duration::from_millis(self.slept_ms.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn sleep(&self, duration: Duration) {
        self.slept_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
        if let Some(delay) = self.real_delay {
            std::thread::sleep(delay);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Notify { title: String, message: String },
    ShowBreak,
    HideBreak,
    UpdateBreak { remaining: Duration, progress: f64 },
    Status { remaining: Duration, progress: f64, kind: StepKind },
    Tray { tooltip: String, kind: StepKind },
    SettingsView(StepKind),
}

#[derive(Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
    fail: bool,
}

impl RecordingView {
    /// A view whose every call records and then fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&ViewCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                ViewCall::Notify { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: ViewCall) -> Result<(), ViewError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(ViewError::Disconnected)
        } else {
            Ok(())
        }
    }
}

impl View for RecordingView {
    fn notify(&self, title: &str, message: &str) -> Result<(), ViewError> {
        self.record(ViewCall::Notify {
            title: title.to_string(),
            message: message.to_string(),
        })
    }

    fn show_break_overlay(&self) -> Result<(), ViewError> {
        self.record(ViewCall::ShowBreak)
    }

    fn hide_break_overlay(&self) -> Result<(), ViewError> {
        self.record(ViewCall::HideBreak)
    }

    fn update_break_overlay(&self, remaining: Duration, progress: f64) -> Result<(), ViewError> {
        self.record(ViewCall::UpdateBreak { remaining, progress })
    }

    fn update_status(
        &self,
        remaining: Duration,
        progress: f64,
        kind: StepKind,
    ) -> Result<(), ViewError> {
        self.record(ViewCall::Status {
            remaining,
            progress,
            kind,
        })
    }

    fn update_tray(&self, tooltip: &str, kind: StepKind) -> Result<(), ViewError> {
        self.record(ViewCall::Tray {
            tooltip: tooltip.to_string(),
            kind,
        })
    }

    fn update_settings_view(&self, kind: StepKind) -> Result<(), ViewError> {
        self.record(ViewCall::SettingsView(kind))
    }
}

/// In-memory store the test can still inspect after handing it over.
#[derive(Clone)]
pub struct SharedStore {
    pub settings: Arc<Mutex<UserSettings>>,
    pub writes: Arc<AtomicU64>,
}

impl SharedStore {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            settings: Arc::new(Mutex::new(settings)),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl SettingsStore for SharedStore {
    fn read(&self) -> UserSettings {
        *self.settings.lock().unwrap()
    }

    fn apply_and_persist(&mut self, settings: &UserSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        *self.settings.lock().unwrap() = *settings;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Keeps every published snapshot.
#[derive(Clone, Default)]
pub struct Recorder {
    snapshots: Arc<Mutex<Vec<Snapshot>>>,
}

impl Recorder {
    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Snapshot> {
        self.snapshots.lock().unwrap().last().copied()
    }

    /// Consecutive published steps with how many ticks each one lasted.
    pub fn runs(&self) -> Vec<(StepKind, usize)> {
        let mut runs: Vec<(StepKind, usize)> = Vec::new();
        for snapshot in self.snapshots.lock().unwrap().iter() {
            let same_step = matches!(
                runs.last(),
                Some((kind, _)) if *kind == snapshot.step_kind && !snapshot.elapsed.is_zero()
            );
            if same_step {
                if let Some(last) = runs.last_mut() {
                    last.1 += 1;
                }
            } else {
                runs.push((snapshot.step_kind, 1));
            }
        }
        runs
    }
}

impl TickObserver for Recorder {
    fn on_tick(&mut self, snapshot: &Snapshot) {
        self.snapshots.lock().unwrap().push(*snapshot);
    }
}

pub fn minutes(work: u32, brk: u32) -> UserSettings {
    UserSettings {
        work_duration_minutes: work,
        break_duration_minutes: brk,
        ..UserSettings::default()
    }
}

pub fn leads(n1: u64, n2: u64) -> SystemConstants {
    SystemConstants {
        notify_1_lead: Duration::from_secs(n1),
        notify_2_lead: Duration::from_secs(n2),
        ..SystemConstants::default()
    }
}

pub struct Harness {
    pub engine: Engine,
    pub view: Arc<RecordingView>,
    pub clock: ManualClock,
    pub store: SharedStore,
    pub recorder: Recorder,
}

impl Harness {
    pub fn new(settings: UserSettings, constants: SystemConstants) -> Self {
        Self::with_view(settings, constants, RecordingView::default())
    }

    pub fn with_view(
        settings: UserSettings,
        constants: SystemConstants,
        view: RecordingView,
    ) -> Self {
        let view = Arc::new(view);
        let clock = ManualClock::default();
        let store = SharedStore::new(settings);
        let recorder = Recorder::default();
        let mut engine = Engine::new(view.clone(), Box::new(store.clone()), constants)
            .with_clock(clock.clone());
        engine.add_observer(recorder.clone());
        Self {
            engine,
            view,
            clock,
            store,
            recorder,
        }
    }

    pub fn with_cadence(mut self, every: u32) -> Self {
        self.engine = self.engine.with_refresh_cadence(every);
        self
    }

    pub fn run(&mut self, iterations: usize) {
        for _ in 0..iterations {
            assert!(self.engine.iterate());
        }
    }

    pub fn kind(&self) -> StepKind {
        self.engine.snapshot().step_kind
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.engine.snapshot().elapsed.as_secs()
    }
}
