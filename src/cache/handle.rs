//! Cache Handle
//!
//! The user-facing cache: a store behind a single lock, optional key and
//! value validators, and the background sweeper it owns.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{active_sweep, CacheStats, CacheStore, SetOptions, SweepReport};
use crate::config::SweepConfig;
use crate::error::{CacheError, Result, ValidationTarget};
use crate::schema::{Issue, Validation, Validator};
use crate::tasks::spawn_sweeper;

// == Cache ==
/// In-process key-value cache with optional validation and TTL expiration.
///
/// Both internal maps live in one [`CacheStore`] guarded by one lock, so a
/// write never becomes visible half-applied.
///
/// # Example
///
/// ```rust,no_run
/// use ttlkv::cache::{now_ms, Cache, SetOptions};
///
/// #[tokio::main]
/// async fn main() -> ttlkv::error::Result<()> {
///     let cache: Cache<String, u32> = Cache::new();
///
///     // Deadlines are absolute: expire ten seconds from now
///     cache
///         .set("session".to_string(), 7, SetOptions::ex(now_ms() + 10_000))
///         .await?;
///     assert_eq!(cache.get("session").await, Some(7));
///
///     cache.cleanup().await;
///     Ok(())
/// }
/// ```
pub struct Cache<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    store: Arc<RwLock<CacheStore<K, V>>>,
    key_validator: Option<Box<dyn Validator<K>>>,
    value_validator: Option<Box<dyn Validator<V>>>,
    sweep: SweepConfig,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache without validators and with default sweep settings.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context. The cache spawns
    /// its background sweeper on construction.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> CacheBuilder<K, V> {
        CacheBuilder::new()
    }

    // == Get ==
    /// Returns the live value for `key`, purging it first if it has expired.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.write().await.get(key).cloned()
    }

    // == Set ==
    /// Validates and stores a value.
    ///
    /// `options.ex` is an absolute epoch-millisecond deadline. Without it, a
    /// live deadline from an earlier write of the same key is kept.
    ///
    /// # Errors
    ///
    /// [`CacheError::Validation`] if a configured validator rejects the key or
    /// the value. Nothing is written in that case.
    pub async fn set(&self, key: K, value: V, options: SetOptions) -> Result<&Self> {
        let key = match &self.key_validator {
            Some(validator) => run_validator(&**validator, key, ValidationTarget::Key).await?,
            None => key,
        };
        let value = match &self.value_validator {
            Some(validator) => {
                run_validator(&**validator, value, ValidationTarget::Value).await?
            }
            None => value,
        };

        self.store.write().await.set(key, value, options);
        Ok(self)
    }

    // == Delete ==
    /// Removes `key` and its deadline. Absent keys are ignored.
    pub async fn delete<Q>(&self, key: &Q) -> &Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.write().await.delete(key);
        self
    }

    // == Exists ==
    pub async fn exists<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.write().await.exists(key)
    }

    // == Expiration Queries ==
    /// `None` if the key has no deadline, otherwise whether it has passed.
    /// Never purges.
    pub async fn is_expired<Q>(&self, key: &Q) -> Option<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.read().await.is_expired(key)
    }

    /// Deadline of `key` in epoch milliseconds, or `None` if it has none.
    pub async fn get_expiration<Q>(&self, key: &Q) -> Option<i64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.read().await.get_expiration(key)
    }

    // == Size ==
    /// Number of stored entries, possibly including expired ones not yet purged.
    pub async fn size(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Manual Sweep ==
    /// Runs one active sweep right now, independent of the background cadence.
    pub async fn sweep_now(&self) -> SweepReport {
        let mut store = self.store.write().await;
        active_sweep(&mut *store, &self.sweep)
    }

    /// Returns true while the background sweeper is running.
    pub fn is_sweeping(&self) -> bool {
        let sweeper = match self.sweeper.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        sweeper.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    // == Cleanup ==
    /// Stops the background sweeper and clears every entry.
    ///
    /// The sweeper is never restarted; later writes only expire lazily.
    pub async fn cleanup(&self) {
        let handle = {
            let mut sweeper = match self.sweeper.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            sweeper.take()
        };

        if let Some(handle) = handle {
            handle.abort();
            info!("Expiration sweeper stopped");
        }

        self.store.write().await.clear();
    }

    #[cfg(test)]
    pub(crate) async fn is_consistent(&self) -> bool {
        self.store.read().await.is_consistent()
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

async fn run_validator<T>(
    validator: &dyn Validator<T>,
    input: T,
    target: ValidationTarget,
) -> Result<T>
where
    T: Send + 'static,
{
    match validator.validate(input).await {
        Validation::Valid(output) => Ok(output),
        Validation::Invalid(mut issues) => {
            if issues.is_empty() {
                issues.push(Issue::new("rejected by validator"));
            }
            warn!(%target, issues = issues.len(), "Rejected cache write");
            Err(CacheError::Validation { target, issues })
        }
    }
}

// == Builder ==
/// Configures validators and sweep tuning before the cache starts.
pub struct CacheBuilder<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    key_validator: Option<Box<dyn Validator<K>>>,
    value_validator: Option<Box<dyn Validator<V>>>,
    sweep: SweepConfig,
}

impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            key_validator: None,
            value_validator: None,
            sweep: SweepConfig::default(),
        }
    }

    pub fn key_validator(mut self, validator: impl Validator<K> + 'static) -> Self {
        self.key_validator = Some(Box::new(validator));
        self
    }

    pub fn value_validator(mut self, validator: impl Validator<V> + 'static) -> Self {
        self.value_validator = Some(Box::new(validator));
        self
    }

    /// Sets sweep tuning; out-of-range values fall back to defaults.
    pub fn sweep_config(mut self, sweep: SweepConfig) -> Self {
        self.sweep = sweep;
        self
    }

    /// Builds the cache and starts its background sweeper.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn build(self) -> Cache<K, V> {
        let sweep = self.sweep.validated();
        let store = Arc::new(RwLock::new(CacheStore::new()));
        let sweeper = spawn_sweeper(Arc::downgrade(&store), sweep.clone());

        Cache {
            store,
            key_validator: self.key_validator,
            value_validator: self.value_validator,
            sweep,
            sweeper: Mutex::new(Some(sweeper)),
        }
    }
}

impl<K, V> Default for CacheBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
