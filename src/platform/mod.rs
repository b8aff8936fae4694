//! Platform abstraction layer
//!
//! Host-loop timing. The host polls a [`TickGate`] and runs one simulation
//! tick whenever it admits one; missed periods are not caught up.

use std::time::{Duration, Instant};

/// Fixed-rate gate admitting at most one step per elapsed period
#[derive(Debug, Clone)]
pub struct TickGate {
    period: Duration,
    last: Instant,
}

impl TickGate {
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn starting_at(period: Duration, start: Instant) -> Self {
        Self { period, last: start }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Admit a step if a full period has passed since the last one
    pub fn admit(&mut self) -> bool {
        self.admit_at(Instant::now())
    }

    pub fn admit_at(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) < self.period {
            return false;
        }
        self.last = now;
        true
    }

    /// Time left before the next step is due
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.period.saturating_sub(now.saturating_duration_since(self.last))
    }
}
