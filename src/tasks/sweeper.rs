//! Active Expiration Sweeper
//!
//! Background task that periodically runs the sampling sweep over a cache
//! store.

use std::hash::Hash;
use std::sync::Weak;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{active_sweep, CacheStore};
use crate::config::SweepConfig;

/// Spawns a background task that runs an active sweep every `config.interval`.
///
/// The task only holds a weak reference to the store: once the owning cache
/// is gone, the next tick finds nothing to upgrade and the task ends. Call
/// `abort` on the returned handle to stop it earlier.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime context.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::<String, String>::new()));
/// let handle = spawn_sweeper(Arc::downgrade(&store), SweepConfig::default());
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweeper<K, V>(
    store: Weak<RwLock<CacheStore<K, V>>>,
    config: SweepConfig,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting expiration sweeper: interval={:?}, sample_fraction={}, hit_threshold={}",
            config.interval, config.sample_fraction, config.hit_threshold
        );

        loop {
            tokio::time::sleep(config.interval).await;

            let Some(store) = store.upgrade() else {
                debug!("Cache store dropped, expiration sweeper exiting");
                return;
            };

            let report = {
                let mut guard = store.write().await;
                active_sweep(&mut *guard, &config)
            };

            if report.evicted > 0 {
                info!(
                    evicted = report.evicted,
                    sampled = report.sampled,
                    rounds = report.rounds,
                    "Expiration sweep evicted expired entries"
                );
            } else {
                debug!(sampled = report.sampled, "Expiration sweep found nothing to evict");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{now_ms, SetOptions};
    use std::sync::Arc;
    use std::time::Duration;

    fn fast() -> SweepConfig {
        SweepConfig {
            interval: Duration::from_millis(20),
            ..SweepConfig::default()
        }
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let store = Arc::new(RwLock::new(CacheStore::new()));
        {
            let mut guard = store.write().await;
            for i in 0..50 {
                guard.set(format!("expire_soon:{i}"), i, SetOptions::ex(now_ms() + 30));
            }
            guard.set("persistent".to_string(), 0, SetOptions::default());
        }

        let handle = spawn_sweeper(Arc::downgrade(&store), fast());

        tokio::time::sleep(Duration::from_millis(400)).await;

        {
            let guard = store.read().await;
            assert_eq!(guard.len(), 1, "Expired entries should have been swept");
            assert_eq!(guard.expiring_len(), 0);
            assert!(guard.stats().swept > 0);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_preserves_valid_entries() {
        let store = Arc::new(RwLock::new(CacheStore::new()));
        store
            .write()
            .await
            .set("long_lived".to_string(), "value", SetOptions::ex(now_ms() + 3_600_000));

        let handle = spawn_sweeper(Arc::downgrade(&store), fast());

        tokio::time::sleep(Duration::from_millis(100)).await;

        {
            let mut guard = store.write().await;
            assert_eq!(guard.get("long_lived"), Some(&"value"));
            assert!(guard.stats().sweep_rounds > 0);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_can_be_aborted() {
        let store = Arc::new(RwLock::new(CacheStore::<String, u32>::new()));

        let handle = spawn_sweeper(Arc::downgrade(&store), fast());
        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }

    #[tokio::test]
    async fn test_sweeper_exits_when_store_dropped() {
        let store = Arc::new(RwLock::new(CacheStore::<String, u32>::new()));

        let handle = spawn_sweeper(Arc::downgrade(&store), fast());
        drop(store);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should exit once the store is gone");
    }
}
