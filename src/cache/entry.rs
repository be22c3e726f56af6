//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use serde_json::Value;

/// Lifetime given to entries whose TTL would overflow the monotonic clock.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 86_400);

// == Cache Entry ==
/// A single cached value with its expiry.
///
/// Recency is not stored here; the store's LRU ordering owns it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value, opaque to the cache
    pub value: Value,
    /// When the entry stops being visible
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl_seconds` from now.
    ///
    /// TTLs too large for the clock are capped at a century.
    pub fn new(value: Value, ttl_seconds: u64) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(ttl_seconds))
            .unwrap_or(now + FAR_FUTURE);
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a fixed instant, so a
    /// sweep uses a single "now" for every entry.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
