//! Cache Statistics Module
//!
//! Per-process counters kept by the cache front.

use serde::Serialize;

// == Cache Stats ==
/// Counters for reads, writes and invalidations made through one cache front.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads that returned a stored value
    pub hits: u64,
    /// Reads that found nothing usable (absent, expired, corrupt, filling)
    pub misses: u64,
    /// Writes the substrate accepted
    pub writes: u64,
    /// Writes the substrate refused
    pub rejected_writes: u64,
    /// Delete calls, whether or not the key existed
    pub deletes: u64,
    /// Partition generation bumps
    pub clears: u64,
}

impl CacheStats {
    /// Creates zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
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

    /// Counts a write as accepted or rejected
    pub fn record_write(&mut self, stored: bool) {
        if stored {
            self.writes += 1;
        } else {
            self.rejected_writes += 1;
        }
    }

    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub fn record_clear(&mut self) {
        self.clears += 1;
    }
}
