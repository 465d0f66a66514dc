use std::time::{Instant, SystemTime, UNIX_EPOCH};

use super::types::Tick;

/// Source of monotonic ticks.
pub trait Clock {
    fn now(&self) -> Tick;
}

/// `Instant`-based clock.
///
/// Ticks start at the wall-clock time the clock was created, so tick-named
/// files from an earlier run do not collide with this one.
pub struct MonotonicClock {
    origin: Instant,
    base_nanos: u64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        let base_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self {
            origin: Instant::now(),
            base_nanos,
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Tick {
        let elapsed = self.origin.elapsed().as_nanos() as u64;
        Tick::from_nanos(self.base_nanos.saturating_add(elapsed))
    }
}
