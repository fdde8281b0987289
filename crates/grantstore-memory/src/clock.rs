//! Time sources for expiry evaluation.

use std::sync::atomic::{AtomicI64, Ordering};

use time::{Duration, OffsetDateTime};

/// Source of "now" used to decide whether a key has expired.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to. Second resolution, like the
/// store's expiry.
#[derive(Debug)]
pub struct ManualClock {
    unix_seconds: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at `at`.
    #[must_use]
    pub fn new(at: OffsetDateTime) -> Self {
        Self {
            unix_seconds: AtomicI64::new(at.unix_timestamp()),
        }
    }

    /// Moves the clock to `at`.
    pub fn set(&self, at: OffsetDateTime) {
        self.unix_seconds.store(at.unix_timestamp(), Ordering::SeqCst);
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.unix_seconds
            .fetch_add(by.whole_seconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        let secs = self.unix_seconds.load(Ordering::SeqCst);
        OffsetDateTime::from_unix_timestamp(secs).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(datetime!(2024-03-01 12:00:00 UTC));
        assert_eq!(clock.now(), datetime!(2024-03-01 12:00:00 UTC));

        clock.advance(Duration::seconds(59));
        assert_eq!(clock.now(), datetime!(2024-03-01 12:00:59 UTC));

        clock.set(datetime!(2025-01-01 00:00:00 UTC));
        assert_eq!(clock.now(), datetime!(2025-01-01 00:00:00 UTC));
    }
}
