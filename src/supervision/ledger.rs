//! # Restart ledger: sliding-window failure accounting.
//!
//! One ledger per supervised child, owned by the supervisor's dispatch loop.
//!
//! ```text
//! record(now, window):
//!   push now ─► drop entries older than `window` ─► return entries left
//!
//! window = 1s, failures at t=0.0, 0.4, 0.9 → len 3
//! next failure at t=2.5                   → len 1 (retry count back to 0)
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Timestamps of a child's recent failures.
#[derive(Debug, Default, Clone)]
pub struct RestartLedger {
    failures: VecDeque<Instant>,
}

impl RestartLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure at `now` and prunes entries older than `window`.
    ///
    /// Returns the number of failures inside the window, including this one.
    pub fn record(&mut self, now: Instant, window: Duration) -> usize {
        self.failures.push_back(now);
        while let Some(&oldest) = self.failures.front() {
            if now.saturating_duration_since(oldest) > window {
                self.failures.pop_front();
            } else {
                break;
            }
        }
        self.failures.len()
    }

    /// Failures inside the window, excluding the latest one.
    pub fn retry_count(&self) -> u32 {
        self.failures.len().saturating_sub(1).min(u32::MAX as usize) as u32
    }

    /// Oldest failure still inside the window.
    pub fn window_start(&self) -> Option<Instant> {
        self.failures.front().copied()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// True if no failure is recorded.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}
