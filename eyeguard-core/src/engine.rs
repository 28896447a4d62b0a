//! The step state machine and its control loop.
//!
//! ```text
//! working -> notify_1 -> notify_2 -> break -> working
//! suspended -> working
//! off -> off            (left only through an override)
//! ```
//!
//! One control thread owns the loop. User overrides arrive through an
//! [`EngineHandle`] from any other thread; they are queued under the same
//! mutex that guards the current step and the duration table, and applied
//! by the control thread at the next iteration boundary, so they wait at
//! most one tick.

use crate::clock::{Clock, SystemClock, TICK};
use crate::durations::{OffPolicy, StepDurations, SystemConstants};
use crate::error::ViewError;
use crate::observer::{Snapshot, TickObserver, ViewRefresher};
use crate::settings::{SettingsStore, UserSettings};
use crate::state::CurrentState;
use crate::step::StepKind;
use crate::view::{format_hms, View};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const APP_TITLE: &str = "EyeGuard";

/// Override requested from outside the control thread.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    ToggleProtection,
    TakeBreakNow,
    ApplySettings(UserSettings),
    SetStep(StepKind),
    Shutdown,
}

/// State shared between the control thread and the handles.
#[derive(Debug)]
struct Shared {
    current: CurrentState,
    durations: StepDurations,
    settings: UserSettings,
    pending: VecDeque<Command>,
    running: bool,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // Every write to `Shared` leaves it consistent, so a panic elsewhere
    // does not invalidate it.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable entry point for the UI thread.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    shared: Arc<Mutex<Shared>>,
}

impl EngineHandle {
    /// Suspend protection, or resume it when already suspended.
    pub fn toggle_protection(&self) {
        self.push(Command::ToggleProtection);
    }

    /// Jump straight to a break. No-op during a break.
    pub fn take_break_now(&self) {
        self.push(Command::TakeBreakNow);
    }

    /// Persist new settings and apply them to the running cycle.
    pub fn apply_new_settings(&self, settings: UserSettings) {
        self.push(Command::ApplySettings(settings));
    }

    /// Force a step, e.g. `working` when the break overlay is closed.
    pub fn set_step(&self, step_kind: StepKind) {
        self.push(Command::SetStep(step_kind));
    }

    /// Ask the control loop to return at its next iteration.
    pub fn shutdown(&self) {
        self.push(Command::Shutdown);
    }

    pub fn current_snapshot(&self) -> Snapshot {
        let shared = lock(&self.shared);
        Snapshot::capture(&shared.current, &shared.durations)
    }

    pub fn current_settings(&self) -> UserSettings {
        lock(&self.shared).settings
    }

    fn push(&self, command: Command) {
        debug!(?command, "override queued");
        lock(&self.shared).pending.push_back(command);
    }
}

/// A step that was entered during one iteration, with the values its entry
/// action needs.
struct Entered {
    kind: StepKind,
    snapshot: Snapshot,
    settings: UserSettings,
}

pub struct Engine {
    shared: Arc<Mutex<Shared>>,
    view: Arc<dyn View>,
    store: Box<dyn SettingsStore>,
    clock: Box<dyn Clock>,
    constants: SystemConstants,
    refresher: ViewRefresher<Arc<dyn View>>,
    observers: Vec<Box<dyn TickObserver>>,
    started: bool,
    overlay_shown: bool,
}

impl Engine {
    /// Build an engine from the stored settings. It starts in `off` when
    /// protection is switched off, in `working` otherwise.
    pub fn new(
        view: Arc<dyn View>,
        store: Box<dyn SettingsStore>,
        constants: SystemConstants,
    ) -> Self {
        let settings = store.read();
        let durations = StepDurations::recompute(&settings, &constants);
        let first = if settings.protection_on() {
            StepKind::Working
        } else {
            StepKind::Off
        };
        let shared = Shared {
            current: CurrentState::new(first, durations[first]),
            durations,
            settings,
            pending: VecDeque::new(),
            running: true,
        };

        Self {
            shared: Arc::new(Mutex::new(shared)),
            refresher: ViewRefresher::new(Arc::clone(&view)),
            view,
            store,
            clock: Box::new(SystemClock),
            constants,
            observers: Vec::new(),
            started: false,
            overlay_shown: false,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Refresh status and tray every `every` ticks instead of every tick.
    pub fn with_refresh_cadence(mut self, every: u32) -> Self {
        self.refresher = ViewRefresher::with_cadence(Arc::clone(&self.view), every);
        self
    }

    pub fn add_observer(&mut self, observer: impl TickObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let shared = lock(&self.shared);
        Snapshot::capture(&shared.current, &shared.durations)
    }

    pub fn durations(&self) -> StepDurations {
        lock(&self.shared).durations
    }

    /// Run the control loop on a dedicated thread.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("step-engine".to_string())
            .spawn(move || self.run())
    }

    /// Run the control loop on the current thread until shut down.
    pub fn run(mut self) {
        info!(step = %self.snapshot().step_kind, "step engine started");
        while self.iterate() {}
        info!("step engine stopped");
    }

    /// One wait-loop iteration: apply queued overrides, move on if the step
    /// has ended, fire entry actions, publish the tick, sleep, then count
    /// the tick. Returns `false` once shut down.
    pub fn iterate(&mut self) -> bool {
        let (entered, snapshot, to_persist, running) = {
            let mut shared = lock(&self.shared);
            let mut entered = Vec::new();
            let mut to_persist = None;

            if !self.started {
                self.started = true;
                entered.push(entered_now(&shared));
            }

            while let Some(command) = shared.pending.pop_front() {
                match command {
                    Command::Shutdown => {
                        shared.running = false;
                        break;
                    }
                    Command::ApplySettings(settings) => {
                        to_persist = Some(settings);
                        if let Some(next) = self.apply_settings(&mut shared, settings) {
                            transition(&mut shared, next);
                            entered.push(entered_now(&shared));
                        }
                    }
                    command => {
                        if let Some(next) = resolve_override(shared.current.step_type(), &command) {
                            info!(?command, from = %shared.current.step_type(), to = %next, "override");
                            transition(&mut shared, next);
                            entered.push(entered_now(&shared));
                        }
                    }
                }
            }

            // A chain of zero-length steps is walked in one go, bounded so
            // a degenerate table cannot spin here forever.
            for _ in 0..StepKind::COUNT {
                if !shared.running || !self.step_ended(&shared.current) {
                    break;
                }
                let next = self.next_step(shared.current.step_type());
                transition(&mut shared, next);
                entered.push(entered_now(&shared));
            }

            let snapshot = Snapshot::capture(&shared.current, &shared.durations);
            (entered, snapshot, to_persist, shared.running)
        };

        // Settings queued ahead of a shutdown are still written.
        if let Some(settings) = to_persist {
            if let Err(e) = self.store.apply_and_persist(&settings) {
                error!("failed to persist settings: {}", e);
            }
        }
        if !running {
            return false;
        }

        for step in &entered {
            self.run_entry_actions(step);
        }

        self.refresher.on_tick(&snapshot);
        for observer in &mut self.observers {
            observer.on_tick(&snapshot);
        }

        self.clock.sleep(TICK);

        let mut shared = lock(&self.shared);
        let accumulates = !(shared.current.step_type() == StepKind::Off
            && self.constants.off_policy == OffPolicy::Indefinite);
        if accumulates && !shared.current.has_ended() {
            shared.current.tick(TICK);
        }
        true
    }

    fn step_ended(&self, current: &CurrentState) -> bool {
        if current.step_type() == StepKind::Off && self.constants.off_policy == OffPolicy::Indefinite
        {
            return false;
        }
        current.has_ended()
    }

    fn next_step(&self, kind: StepKind) -> StepKind {
        match (kind, self.constants.off_policy) {
            (StepKind::Off, OffPolicy::ResumeAfterTimeout) => StepKind::Working,
            (kind, _) => kind.next(),
        }
    }

    /// Recompute durations and refresh the running work step. Returns the
    /// step to move to when the protection switch changed.
    fn apply_settings(&self, shared: &mut Shared, settings: UserSettings) -> Option<StepKind> {
        info!(?settings, "applying new settings");
        shared.settings = settings;
        shared.durations = StepDurations::recompute(&settings, &self.constants);

        let kind = shared.current.step_type();
        if kind.is_work() {
            shared.current.refresh_duration(shared.durations[kind]);
        }

        match (settings.protection_on(), kind) {
            (false, StepKind::Off) => None,
            (false, _) => Some(StepKind::Off),
            (true, StepKind::Off) => Some(StepKind::Working),
            (true, _) => None,
        }
    }

    fn run_entry_actions(&mut self, step: &Entered) {
        info!(
            step = %step.kind,
            duration_secs = step.snapshot.step_duration.as_secs(),
            "entered step"
        );
        let view = Arc::clone(&self.view);
        let mut results = Vec::with_capacity(3);

        match step.kind {
            StepKind::Off => {
                results.push(self.hide_overlay());
                results.push(view.notify(APP_TITLE, "Protection is off"));
            }
            StepKind::Suspended => {
                results.push(self.hide_overlay());
                let minutes = step.snapshot.step_duration.as_secs() / 60;
                results.push(view.notify(
                    APP_TITLE,
                    &format!("Protection suspended for {} minutes", minutes),
                ));
            }
            StepKind::Break => {
                if !self.overlay_shown {
                    self.overlay_shown = true;
                    results.push(view.show_break_overlay());
                }
                results.push(view.update_break_overlay(step.snapshot.remaining, 0.0));
            }
            StepKind::Notify1 | StepKind::Notify2 => {
                results.push(self.hide_overlay());
                // A collapsed warning is passed through without a popup.
                if step.settings.notifications_enabled()
                    && !step.snapshot.step_duration.is_zero()
                {
                    results.push(view.notify(
                        "Break soon",
                        &format!("Break in {}", humanize(step.snapshot.remaining_to_break)),
                    ));
                }
            }
            StepKind::Working => {
                self.overlay_shown = false;
                results.push(view.hide_break_overlay());
            }
        }
        results.push(view.update_settings_view(step.kind));

        for result in results {
            if let Err(e) = result {
                warn!(step = %step.kind, "entry action failed: {}", e);
            }
        }
    }

    fn hide_overlay(&mut self) -> Result<(), ViewError> {
        if self.overlay_shown {
            self.overlay_shown = false;
            self.view.hide_break_overlay()
        } else {
            Ok(())
        }
    }
}

fn transition(shared: &mut Shared, next: StepKind) {
    debug!(
        from = %shared.current.step_type(),
        to = %next,
        elapsed_secs = shared.current.elapsed().as_secs(),
        "step transition"
    );
    let duration = shared.durations[next];
    shared.current.set(next, duration);
}

fn entered_now(shared: &Shared) -> Entered {
    Entered {
        kind: shared.current.step_type(),
        snapshot: Snapshot::capture(&shared.current, &shared.durations),
        settings: shared.settings,
    }
}

/// Target step of a user override, `None` when it changes nothing.
fn resolve_override(current: StepKind, command: &Command) -> Option<StepKind> {
    let target = match command {
        Command::ToggleProtection if current == StepKind::Suspended => StepKind::Working,
        Command::ToggleProtection => StepKind::Suspended,
        Command::TakeBreakNow => StepKind::Break,
        Command::SetStep(kind) => *kind,
        Command::ApplySettings(_) | Command::Shutdown => return None,
    };
    (target != current).then_some(target)
}

/// "5 seconds", "1 minute", "2 minutes 30 seconds".
fn humanize(duration: Duration) -> String {
    let secs = duration.as_secs();
    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };
    match (secs / 60, secs % 60) {
        (0, s) => plural(s, "second"),
        (m, 0) => plural(m, "minute"),
        (m, s) if m >= 10 => format_hms(Duration::from_secs(m * 60 + s)),
        (m, s) => format!("{} {}", plural(m, "minute"), plural(s, "second")),
    }
}
