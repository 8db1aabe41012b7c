//! Time management utilities

use std::time::{Duration, Instant};

/// Fixed-interval pacing timer
///
/// Used by loops that should run "once per tick" without spinning: the
/// headless event loop and the demo application logic.
#[derive(Debug)]
pub struct TickTimer {
    interval: Duration,
    next_deadline: Instant,
    tick_count: u64,
}

impl TickTimer {
    /// Create a timer whose first tick is due one interval from now
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: Instant::now() + interval,
            tick_count: 0,
        }
    }

    /// Sleep until the next tick is due, then count it
    ///
    /// A caller that fell behind is not made to catch up with a burst of
    /// zero-length ticks; the schedule restarts from now.
    pub fn wait_next(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next_deadline.checked_duration_since(now) {
            std::thread::sleep(remaining);
            self.next_deadline += self.interval;
        } else {
            self.next_deadline = now + self.interval;
        }
        self.tick_count += 1;
    }

    /// Number of ticks counted so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Simulated time covered by the ticks counted so far
    pub fn simulated_elapsed(&self) -> Duration {
        self.interval.saturating_mul(u32::try_from(self.tick_count).unwrap_or(u32::MAX))
    }
}
