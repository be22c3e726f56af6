//! Entry Store Module
//!
//! Bounded key/value storage with LRU recency and lazy TTL expiration.

use std::time::Duration;

use lru::LruCache;
use serde_json::Value;
use tracing::debug;

use crate::cache::CacheEntry;

// == Entry Store ==
/// Local cache storage with LRU eviction and TTL support.
///
/// Recency lives in the `LruCache` ordering. The cache is created unbounded
/// and capacity is enforced here so that eviction always happens before
/// insertion and is reported to the caller.
#[derive(Debug)]
pub struct EntryStore {
    /// Key-value storage ordered by recency
    entries: LruCache<String, CacheEntry>,
    /// Maximum number of entries allowed
    max_size: usize,
}

impl EntryStore {
    // == Constructor ==
    /// Creates a new EntryStore holding at most `max_size` entries.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            max_size,
        }
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// Expired entries are dropped and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = self.entries.peek(key)?.is_expired();
        if expired {
            self.entries.pop(key);
            debug!("Cache entry expired: {}", key);
            return None;
        }

        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores a value with the given TTL in seconds.
    ///
    /// An existing key is replaced and becomes most recently used. A new key
    /// arriving at a full store first evicts the least recently used entry,
    /// whose key is returned.
    pub fn set(&mut self, key: String, value: Value, ttl_seconds: u64) -> Option<String> {
        let entry = CacheEntry::new(value, ttl_seconds);

        if self.entries.contains(&key) {
            self.entries.put(key, entry);
            return None;
        }

        // Nothing fits in a zero-capacity store.
        if self.max_size == 0 {
            debug!("Cache has zero capacity, dropping {}", key);
            return None;
        }

        let evicted = if self.entries.len() >= self.max_size {
            self.entries.pop_lru().map(|(evicted_key, _)| evicted_key)
        } else {
            None
        };

        self.entries.put(key, entry);
        evicted
    }

    // == Delete ==
    /// Removes an entry, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.pop(key).is_some()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Sweep Expired ==
    /// Removes all expired entries and returns how many were removed.
    ///
    /// Surviving entries keep their recency order.
    pub fn sweep_expired(&mut self) -> usize {
        let now = std::time::Instant::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.pop(key);
        }

        expired_keys.len()
    }

    /// Checks for a key without touching its recency or expiring it.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Remaining lifetime of a live entry, without touching its recency.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.entries
            .peek(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    /// Keys ordered from least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().rev().map(|(key, _)| key.clone()).collect()
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    #[test]
    fn test_store_new() {
        let store = EntryStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_size(), 100);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = EntryStore::new(100);

        store.set("key1".to_string(), json!("value1"), 300);

        assert_eq!(store.get("key1"), Some(json!("value1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = EntryStore::new(100);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_delete() {
        let mut store = EntryStore::new(100);

        store.set("key1".to_string(), json!("value1"), 300);
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
        assert!(!store.delete("key1"));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = EntryStore::new(100);

        store.set("key1".to_string(), json!("value1"), 300);
        store.set("key1".to_string(), json!("value2"), 300);

        assert_eq!(store.get("key1"), Some(json!("value2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = EntryStore::new(2);

        store.set("a".to_string(), json!(1), 300);
        store.set("b".to_string(), json!(2), 300);
        let evicted = store.set("a".to_string(), json!(3), 300);

        assert_eq!(evicted, None);
        assert_eq!(store.keys(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = EntryStore::new(100);

        store.set("key1".to_string(), json!("value1"), 1);
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(1100));

        assert_eq!(store.get("key1"), None);
        // Lazy expiry dropped the entry on read
        assert!(!store.contains("key1"));
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = EntryStore::new(3);

        store.set("key1".to_string(), json!(1), 300);
        store.set("key2".to_string(), json!(2), 300);
        store.set("key3".to_string(), json!(3), 300);

        let evicted = store.set("key4".to_string(), json!(4), 300);

        assert_eq!(evicted.as_deref(), Some("key1"));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key4").is_some());
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = EntryStore::new(3);

        store.set("key1".to_string(), json!(1), 300);
        store.set("key2".to_string(), json!(2), 300);
        store.set("key3".to_string(), json!(3), 300);

        store.get("key1");

        let evicted = store.set("key4".to_string(), json!(4), 300);
        assert_eq!(evicted.as_deref(), Some("key2"));
        assert!(store.get("key1").is_some());
    }

    #[test]
    fn test_store_zero_capacity_holds_nothing() {
        let mut store = EntryStore::new(0);

        let evicted = store.set("key1".to_string(), json!(1), 300);

        assert_eq!(evicted, None);
        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_sweep_expired() {
        let mut store = EntryStore::new(100);

        store.set("short".to_string(), json!(1), 1);
        store.set("long_a".to_string(), json!(2), 100);
        store.set("long_b".to_string(), json!(3), 100);

        sleep(Duration::from_millis(1100));

        assert_eq!(store.sweep_expired(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.keys(), vec!["long_a".to_string(), "long_b".to_string()]);
        assert_eq!(store.sweep_expired(), 0);
    }

    #[test]
    fn test_store_clear() {
        let mut store = EntryStore::new(10);
        store.set("a".to_string(), json!(1), 300);
        store.set("b".to_string(), json!(2), 300);

        store.clear();

        assert!(store.is_empty());
    }

    #[test]
    fn test_store_ttl_remaining() {
        let mut store = EntryStore::new(2);
        store.set("a".to_string(), json!(1), 30);
        store.set("b".to_string(), json!(2), 300);

        let remaining = store.ttl_remaining("a").unwrap();
        assert!(remaining <= Duration::from_secs(30));
        assert!(remaining > Duration::from_secs(28));
        assert_eq!(store.ttl_remaining("missing"), None);

        // Peeking does not promote "a"
        store.set("c".to_string(), json!(3), 300);
        assert!(!store.contains("a"));
    }
}
