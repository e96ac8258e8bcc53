//! TTL Purge Task
//!
//! Background task that periodically reclaims expired cache entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{ExpiringCache, ExpiringClockCache};

// == Purge Expired ==
/// Caches that can reclaim their expired entries in one pass.
pub trait PurgeExpired: Send + Sync + 'static {
    /// Removes every expired entry and returns how many were removed.
    fn purge_expired(&self) -> usize;
}

impl<K, V> PurgeExpired for ExpiringClockCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn purge_expired(&self) -> usize {
        ExpiringClockCache::purge_expired(self)
    }
}

impl<K, V> PurgeExpired for ExpiringCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn purge_expired(&self) -> usize {
        ExpiringCache::purge_expired(self)
    }
}

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task sleeps for `interval` between runs and never exits on its own;
/// abort the returned handle to stop it. Must be called from within a tokio
/// runtime.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(ExpiringClockCache::new(1000, Duration::from_secs(300))?);
/// let purge_handle = spawn_purge_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task<C>(cache: Arc<C>, interval: Duration) -> JoinHandle<()>
where
    C: PurgeExpired + ?Sized,
{
    tokio::spawn(async move {
        info!(?interval, "Starting TTL purge task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();

            if removed > 0 {
                info!("TTL purge: removed {} expired entries", removed);
            } else {
                debug!("TTL purge: no expired entries found");
            }
        }
    })
}
