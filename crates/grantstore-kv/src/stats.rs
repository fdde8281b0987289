//! Counters for best-effort reference resolution.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counts what access token loads silently dropped.
///
/// Loading an access token resolves its authorization code and its previous
/// token on a best-effort basis. Each time one of those is discarded, or the
/// chain walk is cut short, the matching counter is bumped.
#[derive(Debug, Default)]
pub struct ResolutionStats {
    /// Authorization codes that failed to load and were left unset.
    pub authorize_discarded: AtomicU64,
    /// Previous tokens that failed to load and were left unset.
    pub previous_discarded: AtomicU64,
    /// Chains cut at the configured depth.
    pub chains_truncated: AtomicU64,
    /// Chains cut because a token appeared twice.
    pub cycles_detected: AtomicU64,
}

impl ResolutionStats {
    pub(crate) fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the current statistics.
    #[must_use]
    pub fn snapshot(&self) -> ResolutionStatsSnapshot {
        ResolutionStatsSnapshot {
            authorize_discarded: self.authorize_discarded.load(Ordering::Relaxed),
            previous_discarded: self.previous_discarded.load(Ordering::Relaxed),
            chains_truncated: self.chains_truncated.load(Ordering::Relaxed),
            cycles_detected: self.cycles_detected.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ResolutionStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStatsSnapshot {
    pub authorize_discarded: u64,
    pub previous_discarded: u64,
    pub chains_truncated: u64,
    pub cycles_detected: u64,
}

impl ResolutionStatsSnapshot {
    /// Total number of discarded or truncated references.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.authorize_discarded + self.previous_discarded + self.chains_truncated + self.cycles_detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = ResolutionStats::default();
        ResolutionStats::record(&stats.authorize_discarded);
        ResolutionStats::record(&stats.authorize_discarded);
        ResolutionStats::record(&stats.cycles_detected);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.authorize_discarded, 2);
        assert_eq!(snapshot.previous_discarded, 0);
        assert_eq!(snapshot.cycles_detected, 1);
        assert_eq!(snapshot.total(), 3);
    }
}
