//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheManager;

/// Spawns a background task that periodically removes expired cache entries.
///
/// The manager only expires entries lazily on read; this task is the
/// scheduler that keeps unread expired entries from occupying capacity.
///
/// # Arguments
/// * `cache` - Shared cache manager
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheManager::new(1000, 3600));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<CacheManager>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            // The sweep only touches the local store, so it never blocks on I/O.
            let removed = cache.cleanup_expired();

            if removed == 0 {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = Arc::new(CacheManager::new(100, 300));
        cache.set("expire_soon", json!("value"), Some(1));

        let handle = spawn_cleanup_task(cache.clone(), 1);

        // Wait for entry to expire and cleanup to run
        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Removed physically, without any read
        assert!(cache.is_empty(), "Expired entry should have been cleaned up");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = Arc::new(CacheManager::new(100, 300));
        cache.set("long_lived", json!("value"), Some(3600));

        let handle = spawn_cleanup_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.get("long_lived"), Some(json!("value")));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache = Arc::new(CacheManager::new(100, 300));

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
