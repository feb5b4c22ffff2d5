//! Cache Statistics Module
//!
//! Tracks lookups and both expiration paths.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache lookup and expiration metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found a live entry
    pub hits: u64,
    /// Number of lookups that found nothing (never set or expired)
    pub misses: u64,
    /// Entries purged because a lookup found them past their deadline
    pub lazy_expirations: u64,
    /// Entries evicted by the active sweep
    pub swept: u64,
    /// Sampling rounds run by the active sweep
    pub sweep_rounds: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current number of entries carrying a deadline
    pub expiring_entries: usize,
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
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
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

    pub fn record_lazy_expiration(&mut self) {
        self.lazy_expirations += 1;
    }

    pub fn record_swept(&mut self, count: usize) {
        self.swept += count as u64;
    }

    pub fn record_sweep_round(&mut self) {
        self.sweep_rounds += 1;
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
        assert_eq!(stats.lazy_expirations, 0);
        assert_eq!(stats.swept, 0);
        assert_eq!(stats.sweep_rounds, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
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
    fn test_record_expirations() {
        let mut stats = CacheStats::new();
        stats.record_lazy_expiration();
        stats.record_swept(3);
        stats.record_swept(2);
        stats.record_sweep_round();
        assert_eq!(stats.lazy_expirations, 1);
        assert_eq!(stats.swept, 5);
        assert_eq!(stats.sweep_rounds, 1);
    }
}
