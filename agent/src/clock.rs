//! Millisecond clocks used to timestamp work records.
//!
//! Record timestamps must never decrease, even if the system clock is
//! stepped backwards while the agent runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch, non-decreasing across calls.
    fn now_ms(&self) -> u64;
}

/// Wall clock sampled once at start-up, advanced by a monotonic timer.
#[derive(Debug)]
pub struct MonotonicClock {
    origin_ms: u64,
    started: Instant,
    last: AtomicU64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        let origin_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            origin_ms,
            started: Instant::now(),
            last: AtomicU64::new(origin_ms),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        let now = self
            .origin_ms
            .saturating_add(self.started.elapsed().as_millis() as u64);
        let previous = self.last.fetch_max(now, Ordering::SeqCst);
        previous.max(now)
    }
}

/// Deterministic clock: returns `start`, then advances by `step_ms` per read.
#[derive(Debug)]
pub struct ManualClock {
    next: AtomicU64,
    step_ms: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self::with_step(start_ms, 0)
    }

    pub fn with_step(start_ms: u64, step_ms: u64) -> Self {
        Self {
            next: AtomicU64::new(start_ms),
            step_ms,
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.next.fetch_add(self.step_ms, Ordering::SeqCst)
    }
}
