//! Dashboard Warm-up Task
//!
//! Background task that periodically pre-populates the dashboard caches.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::dashboard::DashboardCache;

/// Spawns a task that refreshes the dashboard caches every `interval_secs`.
///
/// Each run goes through the memoized functions, so only entries that are
/// missing or expired hit the data source. The first run happens immediately.
pub fn spawn_warmup_task(
    dashboard: Arc<DashboardCache>,
    interval_secs: u64,
    period: String,
    user_id: i64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting dashboard warm-up task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            let dashboard = dashboard.clone();
            let period = period.clone();
            // Warm-up may wait on the remote mirror, keep it off the async workers.
            let outcome =
                tokio::task::spawn_blocking(move || dashboard.warm(&period, user_id)).await;

            match outcome {
                Ok(Ok(())) => info!("Dashboard cache warmed"),
                Ok(Err(err)) => warn!("Dashboard warm-up failed: {}", err),
                Err(err) => warn!("Dashboard warm-up task panicked: {}", err),
            }

            tokio::time::sleep(interval).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheManager;
    use crate::dashboard::{InMemoryMetricsSource, CHART_TYPES};

    #[tokio::test]
    async fn test_warmup_populates_dashboard_entries() {
        let cache = Arc::new(CacheManager::new(100, 3600));
        let dashboard = Arc::new(DashboardCache::new(
            cache.clone(),
            Arc::new(InMemoryMetricsSource::new()),
        ));

        let handle = spawn_warmup_task(dashboard, 60, "24h".to_string(), 1);
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.abort();

        assert_eq!(cache.len(), 2 + CHART_TYPES.len());
    }
}
