//! Cache Module
//!
//! In-process LRU cache with TTL expiration, an optional remote mirror,
//! hit/miss accounting and function memoization.

mod entry;
mod key;
mod manager;
mod memoize;
mod remote;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{derive_key, fallback_key, KeywordArgs, KEY_PREFIX};
pub use manager::CacheManager;
pub use memoize::{cached, invalidate_for, CacheHandle, Memoized};
pub use remote::{connect_remote, RedisMirror, RemoteMirror};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::EntryStore;
