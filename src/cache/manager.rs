//! Cache Manager Module
//!
//! Orchestrates the local entry store, the optional remote mirror and the
//! hit/miss/eviction counters.

use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{EntryStore, RemoteMirror, CacheStats, StatsSnapshot};
use crate::config::Config;

/// Local state guarded by a single lock so capacity and recency stay consistent.
#[derive(Debug)]
struct Inner {
    store: EntryStore,
    stats: CacheStats,
}

// == Cache Manager ==
/// Bounded LRU cache with per-entry TTL and an optional write-through mirror.
///
/// Construct one per process and share it as `Arc<CacheManager>`. Remote
/// calls never hold the local lock and never fail an operation: any mirror
/// error is logged and the manager carries on with the local store.
pub struct CacheManager {
    inner: Mutex<Inner>,
    remote: Option<Box<dyn RemoteMirror>>,
    max_size: usize,
    default_ttl: u64,
}

impl CacheManager {
    // == Constructors ==
    /// Creates a local-only manager.
    pub fn new(max_size: usize, default_ttl: u64) -> Self {
        Self::with_remote(max_size, default_ttl, None)
    }

    /// Creates a manager mirroring writes to `remote` when present.
    ///
    /// A zero default TTL is raised to one second.
    pub fn with_remote(
        max_size: usize,
        default_ttl: u64,
        remote: Option<Box<dyn RemoteMirror>>,
    ) -> Self {
        let default_ttl = default_ttl.max(1);
        info!(
            "Cache manager initialized (max_size={}, default_ttl={}s, remote={})",
            max_size,
            default_ttl,
            remote.is_some()
        );
        Self {
            inner: Mutex::new(Inner {
                store: EntryStore::new(max_size),
                stats: CacheStats::new(),
            }),
            remote,
            max_size,
            default_ttl,
        }
    }

    /// Creates a manager from configuration, connecting the mirror if one is configured.
    pub fn from_config(config: &Config) -> Self {
        let remote = crate::cache::connect_remote(config);
        Self::with_remote(config.max_size, config.default_ttl, remote)
    }

    // == Get ==
    /// Looks a key up, remote mirror first, then the local store.
    ///
    /// Every call counts one request and exactly one hit or miss. A remote hit
    /// is returned as-is and not copied into the local store. A stored JSON
    /// `null` comes back as `Some(Value::Null)`; callers that treat null as
    /// "nothing cached" cannot tell it apart from a miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.remote_get(key) {
            self.inner.lock().stats.record_hit();
            debug!("Cache hit (remote): {}", key);
            return Some(value);
        }

        let mut inner = self.inner.lock();
        match inner.store.get(key) {
            Some(value) => {
                inner.stats.record_hit();
                debug!("Cache hit (local): {}", key);
                Some(value)
            }
            None => {
                inner.stats.record_miss();
                debug!("Cache miss: {}", key);
                None
            }
        }
    }

    // == Set ==
    /// Stores a value for `ttl` seconds, or the default TTL when `ttl` is
    /// `None` or zero.
    pub fn set(&self, key: &str, value: Value, ttl: Option<u64>) {
        let ttl = self.effective_ttl(ttl);

        if let Some(remote) = &self.remote {
            match serde_json::to_string(&value) {
                Ok(payload) => match remote.set_with_expiry(key, &payload, ttl) {
                    Ok(()) => debug!("Stored in remote mirror: {} (ttl={}s)", key, ttl),
                    Err(err) => debug!("Remote write error for {}: {}", key, err),
                },
                Err(err) => debug!("Could not serialize {} for remote mirror: {}", key, err),
            }
        }

        let mut inner = self.inner.lock();
        if let Some(evicted) = inner.store.set(key.to_string(), value, ttl) {
            inner.stats.record_eviction();
            debug!("Cache eviction: {} (max_size={})", evicted, self.max_size);
        }
        debug!("Stored in local cache: {} (ttl={}s)", key, ttl);
    }

    // == Invalidate ==
    /// Removes a key locally and from the mirror. Missing keys are fine.
    pub fn invalidate(&self, key: &str) {
        if self.inner.lock().store.delete(key) {
            info!("Cache invalidated: {}", key);
        }

        if let Some(remote) = &self.remote {
            if let Err(err) = remote.delete(key) {
                debug!("Remote delete error for {}: {}", key, err);
            }
        }
    }

    // == Clear ==
    /// Drops every local entry and flushes the mirror's whole namespace.
    ///
    /// This is global: it is not scoped to any function or key prefix.
    pub fn clear(&self) {
        self.inner.lock().store.clear();

        if let Some(remote) = &self.remote {
            if let Err(err) = remote.flush_namespace() {
                debug!("Remote flush error: {}", err);
            }
        }
        info!("Cache cleared");
    }

    // == Stats ==
    /// Returns the counters plus the current cache shape.
    pub fn get_stats(&self) -> StatsSnapshot {
        let inner = self.inner.lock();
        StatsSnapshot::new(
            &inner.stats,
            inner.store.len(),
            self.max_size,
            self.remote.is_some(),
        )
    }

    // == Cleanup Expired ==
    /// Physically removes expired local entries, returning how many went.
    pub fn cleanup_expired(&self) -> usize {
        let removed = self.inner.lock().store.sweep_expired();
        if removed > 0 {
            info!("Cleanup: removed {} expired entries", removed);
        }
        removed
    }

    /// Entries currently held locally.
    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }

    /// Remaining lifetime of a live local entry. Not counted as a request.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.inner.lock().store.ttl_remaining(key)
    }

    /// Local keys from least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().store.keys()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    pub fn remote_connected(&self) -> bool {
        self.remote.is_some()
    }

    fn effective_ttl(&self, ttl: Option<u64>) -> u64 {
        match ttl {
            Some(ttl) if ttl > 0 => ttl,
            _ => self.default_ttl,
        }
    }

    /// Remote lookup; any failure or unusable payload reads as "not there".
    fn remote_get(&self, key: &str) -> Option<Value> {
        let remote = self.remote.as_ref()?;
        match remote.get(key) {
            Ok(Some(payload)) if !payload.is_empty() => match serde_json::from_str(&payload) {
                Ok(value) => Some(value),
                Err(err) => {
                    debug!("Unreadable remote payload for {}: {}", key, err);
                    None
                }
            },
            Ok(_) => None,
            Err(err) => {
                debug!("Remote read error for {}: {}", key, err);
                None
            }
        }
    }
}
