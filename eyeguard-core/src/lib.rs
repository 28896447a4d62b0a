//! Step-sequencing engine for the EyeGuard break reminder.
//!
//! The engine owns "which step are we in, how long has it lasted, and what
//! comes next". Everything it shows or reads goes through narrow traits
//! ([`View`], [`SettingsStore`], [`Clock`]) so the terminal UI, the settings
//! file and the wall clock can be swapped out in tests.

pub mod clock;
pub mod durations;
pub mod engine;
pub mod error;
pub mod observer;
pub mod settings;
pub mod state;
pub mod step;
pub mod view;

pub use clock::{Clock, SystemClock, TICK};
pub use durations::{OffPolicy, StepDurations, SystemConstants};
pub use engine::{Engine, EngineHandle};
pub use error::{SettingsError, ViewError};
pub use observer::{Snapshot, TickObserver, ViewRefresher};
pub use settings::{MemorySettingsStore, SettingsStore, Switch, UserSettings};
pub use state::CurrentState;
pub use step::StepKind;
pub use view::View;
