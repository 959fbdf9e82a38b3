//! Clock Module
//!
//! Single injectable time source read at the start of each engine operation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

// == Clock Trait ==
/// Source of the current time in Unix milliseconds.
///
/// Implementations must be monotonically non-decreasing.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

// == System Clock ==
/// Wall-clock time that never steps backwards.
///
/// If the system clock is adjusted into the past, the last observed value is
/// returned until wall time catches up again.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        let wall = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let previous = self.last.fetch_max(wall, Ordering::AcqRel);
        previous.max(wall)
    }
}

// == Manual Clock ==
/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Moves time forward by `delta_ms`, saturating at `u64::MAX`.
    pub fn advance(&self, delta_ms: u64) {
        let _ = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(delta_ms))
            });
    }

    /// Sets the current time. Values in the past are ignored.
    pub fn set(&self, now_ms: u64) {
        self.now.fetch_max(now_ms, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);

        clock.advance(2_000);
        assert_eq!(clock.now_ms(), 3_000);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(0);
        let handle = clock.clone();

        handle.advance(500);
        assert_eq!(clock.now_ms(), 500);
    }

    #[test]
    fn test_manual_clock_never_goes_backwards() {
        let clock = ManualClock::new(5_000);
        clock.set(1_000);
        assert_eq!(clock.now_ms(), 5_000);
    }

    #[test]
    fn test_manual_clock_advance_saturates() {
        let clock = ManualClock::new(u64::MAX - 10);
        clock.advance(100);
        assert_eq!(clock.now_ms(), u64::MAX);
        clock.advance(1);
        assert_eq!(clock.now_ms(), u64::MAX);
    }

    #[test]
    fn test_system_clock_is_non_decreasing() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        let second = clock.now_ms();

        assert!(first > 0);
        assert!(second >= first);
    }
}
