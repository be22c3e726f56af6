//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::{Deserialize, Serialize};

// == Cache Stats ==
/// Monotonic counters owned by the cache manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the remote mirror or the local store
    pub hits: u64,
    /// Lookups that found nothing (absent or expired)
    pub misses: u64,
    /// Entries evicted by the LRU policy
    pub evictions: u64,
    /// Every lookup, hit or miss
    pub total_requests: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Hit rate as a percentage, 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_requests as f64 * 100.0
        }
    }

    /// Hit rate formatted with two decimals, e.g. `"50.00%"`.
    pub fn hit_rate_display(&self) -> String {
        format!("{:.2}%", self.hit_rate())
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.total_requests += 1;
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.total_requests += 1;
        self.misses += 1;
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

// == Stats Snapshot ==
/// Point-in-time view of the manager, as reported by `get_stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_requests: u64,
    /// Percentage with two decimals, e.g. `"60.00%"`
    pub hit_rate: String,
    /// Entries currently held locally (expired ones count until swept)
    pub cache_size: usize,
    pub max_size: usize,
    pub remote_connected: bool,
    /// RFC 3339 UTC time the snapshot was taken
    pub timestamp: String,
}

impl StatsSnapshot {
    /// Builds a snapshot from the counters and the store's current shape.
    pub fn new(
        stats: &CacheStats,
        cache_size: usize,
        max_size: usize,
        remote_connected: bool,
    ) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_requests: stats.total_requests,
            hit_rate: stats.hit_rate_display(),
            cache_size,
            max_size,
            remote_connected,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
