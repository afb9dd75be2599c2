//! # Virtual Clock for Simulation
//!
//! Headless runs never sleep; the clock advances by one tick interval per
//! scheduler slot so reports can state how long the run would have taken.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared nanosecond counter. Clones observe the same time.
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now_ns(&self) -> u64 {
        self.offset.load(Ordering::Acquire)
    }

    #[inline]
    pub fn advance(&self, by: Duration) {
        let ns = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .offset
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(ns))
            });
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.now_ns())
    }
}
