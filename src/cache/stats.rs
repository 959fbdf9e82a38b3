//! Cache Statistics Module
//!
//! Tracks cache counters: hits, misses, expirations, evictions and saves.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of `get` calls that returned a live value
    pub hits: u64,
    /// Number of `get` calls that found nothing (absent or expired)
    pub misses: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of successful snapshot writes
    pub saves: u64,
    /// Number of snapshot writes the backend rejected
    pub save_failures: u64,
    /// Current number of resident entries
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records the outcome of one snapshot write.
    pub fn record_save(&mut self, success: bool) {
        if success {
            self.saves += 1;
        } else {
            self.save_failures += 1;
        }
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_save_outcomes() {
        let mut stats = CacheStats::new();
        stats.record_save(true);
        stats.record_save(true);
        stats.record_save(false);
        assert_eq!(stats.saves, 2);
        assert_eq!(stats.save_failures, 1);
    }

    #[test]
    fn test_record_expiration_and_eviction() {
        let mut stats = CacheStats::new();
        stats.record_expiration();
        stats.record_eviction();
        stats.record_eviction();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.evictions, 2);
    }
}
