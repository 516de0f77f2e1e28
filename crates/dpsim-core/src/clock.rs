//! Simulation clock with a set of pending wake-up times.

use std::collections::BTreeSet;

/// Monotonic integer clock.
///
/// Besides the current time, the clock keeps a set of pending wake-up times registered by simulation
/// components. [`advance`](Clock::advance) jumps directly to the earliest of them, so that a simulation does
/// not need to visit ticks at which nothing can change.
#[derive(Clone, Debug, Default)]
pub struct Clock {
    now: u64,
    // always later than `now`
    pending: BTreeSet<u64>,
}

impl Clock {
    /// Creates a clock at time 0 with no pending wake-ups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current time.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Returns the current time shifted by `delta`. Does not change the clock.
    pub fn delta(&self, delta: f64) -> f64 {
        self.now as f64 + delta
    }

    /// Returns true if `time` is not in the future.
    pub fn passed(&self, time: f64) -> bool {
        time <= self.now as f64
    }

    /// Returns the time elapsed since `time`, or 0 if `time` is still in the future.
    pub fn elapsed_since(&self, time: f64) -> f64 {
        (self.now as f64 - time).max(0.)
    }

    /// Registers a wake-up at `time`.
    ///
    /// Fractional times are rounded up, so that the clock stops at the first tick for which
    /// [`passed(time)`](Clock::passed) holds. Times that are already passed or not finite are ignored.
    pub fn schedule_wake(&mut self, time: f64) {
        if !time.is_finite() {
            return;
        }
        let tick = if time.fract() == 0. {
            time
        } else {
            time.floor() + 1.
        };
        if tick > self.now as f64 {
            self.pending.insert(tick as u64);
        }
    }

    /// Returns the earliest pending wake-up time, if any.
    pub fn next_wake(&self) -> Option<u64> {
        self.pending.iter().next().copied()
    }

    /// Returns the number of pending wake-up times.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Moves the clock to the earliest pending wake-up time, or by one tick if nothing is pending.
    ///
    /// Returns the number of ticks the clock has moved by.
    pub fn advance(&mut self) -> u64 {
        let prev = self.now;
        match self.pending.iter().next().copied() {
            Some(next) => {
                self.pending.remove(&next);
                self.now = next;
            }
            None => self.now += 1,
        }
        self.now - prev
    }
}
