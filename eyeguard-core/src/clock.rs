use std::time::Duration;

/// Engine heartbeat.
pub const TICK: Duration = Duration::from_secs(1);

/// Source of the engine's wait between ticks.
pub trait Clock: Send {
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread for real.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
