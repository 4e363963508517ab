// Deadline handling for a single decision
//
// The caller supplies a `time_left` callable at the start of each decision.
// `Deadline` wraps it together with the abort threshold, and every recursive
// search entry calls `check()` before doing any work.

use std::time::Instant;

use crate::error::SearchTimeout;

/// Remaining-time view of the current decision plus its abort threshold
pub struct Deadline<'a> {
    time_left: &'a dyn Fn() -> f64,
    threshold_ms: f64,
}

impl<'a> Deadline<'a> {
    /// # Arguments
    /// * `time_left` - Milliseconds left in the current turn
    /// * `threshold_ms` - Abort once less than this remains, leaving room to unwind
    pub fn new(time_left: &'a dyn Fn() -> f64, threshold_ms: f64) -> Self {
        Deadline {
            time_left,
            threshold_ms,
        }
    }

    pub fn remaining_ms(&self) -> f64 {
        (self.time_left)()
    }

    pub fn threshold_ms(&self) -> f64 {
        self.threshold_ms
    }

    /// Fails with `SearchTimeout` once the remaining time drops below the threshold
    #[inline]
    pub fn check(&self) -> Result<(), SearchTimeout> {
        if self.remaining_ms() < self.threshold_ms {
            Err(SearchTimeout)
        } else {
            Ok(())
        }
    }
}

/// Wall-clock timer for one turn
#[derive(Debug, Clone, Copy)]
pub struct TurnTimer {
    start: Instant,
    budget_ms: f64,
}

impl TurnTimer {
    /// Starts the clock with `budget_ms` milliseconds to spend
    pub fn start(budget_ms: u64) -> Self {
        TurnTimer {
            start: Instant::now(),
            budget_ms: budget_ms as f64,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Milliseconds left in the budget; negative once it is overspent
    pub fn time_left(&self) -> f64 {
        self.budget_ms - self.elapsed_ms()
    }
}
