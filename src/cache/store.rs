//! Cache Store Module
//!
//! The entry map and the parallel expiration index, kept consistent with each
//! other. Every removal goes through one helper that drops the key from both.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use rand::seq::IteratorRandom;
use rand::Rng;
use tracing::debug;

use crate::cache::expiration::{is_expired_at, now_ms};
use crate::cache::{CacheStats, SetOptions};

// == Cache Store ==
/// Key-value storage with per-key absolute deadlines.
///
/// Reads purge the key they touch if it has expired. `len` does not, so it
/// may count entries that are logically gone but not yet purged.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, V>,
    /// Absolute deadline (epoch ms) for keys that carry one
    expirations: HashMap<K, i64>,
    /// Lookup and expiration statistics
    stats: CacheStats,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            expirations: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// An expired entry is purged from both maps and reported as absent.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.purge_if_expired(key, now_ms()) || !self.entries.contains_key(key) {
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key)
    }

    // == Set ==
    /// Stores a value, replacing any previous one.
    ///
    /// A deadline in `options` is recorded; without one, a live deadline from
    /// an earlier write is kept. A key whose previous entry had already
    /// expired is purged first and treated as new, so its old deadline does
    /// not carry over: `set(k, v1, ex: past)` followed by `set(k, v2)` stores
    /// `v2` with no deadline at all.
    pub fn set(&mut self, key: K, value: V, options: SetOptions) {
        self.purge_if_expired(&key, now_ms());

        if let Some(deadline) = options.ex {
            self.expirations.insert(key.clone(), deadline);
        }
        self.entries.insert(key, value);
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key)
    }

    // == Exists ==
    /// Returns true if a live entry exists, purging it if it has expired.
    pub fn exists<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        !self.purge_if_expired(key, now_ms()) && self.entries.contains_key(key)
    }

    // == Is Expired ==
    /// Reports the expiration state of a key without purging it.
    ///
    /// `None` if the key has no deadline (or was never set).
    pub fn is_expired<Q>(&self, key: &Q) -> Option<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        is_expired_at(self.expirations.get(key).copied(), now_ms())
    }

    // == Get Expiration ==
    /// Returns the deadline (epoch ms) of a key, or `None` if it has none.
    pub fn get_expiration<Q>(&self, key: &Q) -> Option<i64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let deadline = self.expirations.get(key).copied();
        if deadline.is_none() {
            debug!("No expiration set for requested key");
        }
        deadline
    }

    // == Length ==
    /// Number of physically stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries carrying a deadline.
    pub fn expiring_len(&self) -> usize {
        self.expirations.len()
    }

    // == Clear ==
    /// Drops every entry and deadline.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.expirations.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.expiring_entries = self.expirations.len();
        stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    // == Sampling ==
    /// Picks up to `amount` distinct TTL-bearing keys uniformly at random.
    ///
    /// Reservoir sampling walks the whole expiration index, so a round costs
    /// O(n) in TTL-bearing keys even though only `amount` are inspected.
    pub(crate) fn sample_expiring<R>(&self, amount: usize, rng: &mut R) -> Vec<K>
    where
        R: Rng + ?Sized,
    {
        self.expirations
            .keys()
            .choose_multiple(rng, amount)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Evicts `key` if it is expired at `now`, counting it as swept.
    pub(crate) fn evict_if_expired(&mut self, key: &K, now: i64) -> bool {
        if is_expired_at(self.expirations.get(key).copied(), now) != Some(true) {
            return false;
        }
        self.remove(key);
        self.stats.record_swept(1);
        true
    }

    fn purge_if_expired<Q>(&mut self, key: &Q, now: i64) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if is_expired_at(self.expirations.get(key).copied(), now) != Some(true) {
            return false;
        }
        self.remove(key);
        self.stats.record_lazy_expiration();
        debug!("Purged expired entry on access");
        true
    }

    fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.expirations.remove(key);
        self.entries.remove(key).is_some()
    }

    /// Every deadline belongs to a stored entry.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.expirations.keys().all(|key| self.entries.contains_key(key))
    }
}

impl<K, V> Default for CacheStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn past() -> SetOptions {
        SetOptions::ex(now_ms() - 1)
    }

    fn future() -> SetOptions {
        SetOptions::ex(now_ms() + 60_000)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String, String> = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.expiring_len(), 0);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new();
        store.set("key1".to_string(), "value1".to_string(), SetOptions::default());

        assert_eq!(store.get("key1"), Some(&"value1".to_string()));
        assert_eq!(store.is_expired("key1"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_missing_key() {
        let mut store: CacheStore<String, u32> = CacheStore::new();

        assert_eq!(store.get("nonexistent"), None);
        assert!(!store.exists("nonexistent"));
        assert_eq!(store.is_expired("nonexistent"), None);
        assert_eq!(store.get_expiration("nonexistent"), None);
    }

    #[test]
    fn test_store_delete() {
        let mut store = CacheStore::new();
        store.set("key1".to_string(), 1, future());

        assert!(store.delete("key1"));
        assert!(store.is_empty());
        assert_eq!(store.expiring_len(), 0);
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_delete_nonexistent_is_silent() {
        let mut store = CacheStore::new();
        store.set("kept".to_string(), 1, SetOptions::default());

        assert!(!store.delete("nonexistent"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_past_deadline_purges_on_get() {
        let mut store = CacheStore::new();
        store.set("a".to_string(), 1, past());
        assert_eq!(store.len(), 1);

        assert_eq!(store.get("a"), None);
        assert_eq!(store.len(), 0);
        assert_eq!(store.expiring_len(), 0);
        assert_eq!(store.stats().lazy_expirations, 1);
    }

    #[test]
    fn test_store_past_deadline_purges_on_exists() {
        let mut store = CacheStore::new();
        store.set("a".to_string(), 1, past());

        assert!(!store.exists("a"));
        assert!(store.is_empty());
        assert_eq!(store.expiring_len(), 0);
    }

    #[test]
    fn test_store_future_deadline() {
        let mut store = CacheStore::new();
        let options = future();
        store.set("a".to_string(), 1, options);

        assert_eq!(store.get("a"), Some(&1));
        assert!(store.exists("a"));
        assert_eq!(store.is_expired("a"), Some(false));
        assert_eq!(store.get_expiration("a"), options.ex);
    }

    #[test]
    fn test_store_is_expired_does_not_purge() {
        let mut store = CacheStore::new();
        store.set("a".to_string(), 1, past());

        assert_eq!(store.is_expired("a"), Some(true));
        assert_eq!(store.len(), 1);
        assert_eq!(store.expiring_len(), 1);
    }

    #[test]
    fn test_store_overwrite_keeps_live_deadline() {
        let mut store = CacheStore::new();
        let options = future();
        store.set("key1".to_string(), "value1", options);
        store.set("key1".to_string(), "value2", SetOptions::default());

        assert_eq!(store.get("key1"), Some(&"value2"));
        assert_eq!(store.get_expiration("key1"), options.ex);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_replaces_deadline() {
        let mut store = CacheStore::new();
        store.set("key1".to_string(), 1, future());
        store.set("key1".to_string(), 2, SetOptions::ex(42));

        assert_eq!(store.get_expiration("key1"), Some(42));
    }

    #[test]
    fn test_store_overwrite_of_expired_key_starts_fresh() {
        let mut store = CacheStore::new();
        store.set("key1".to_string(), 1, past());
        store.set("key1".to_string(), 2, SetOptions::default());

        assert_eq!(store.get("key1"), Some(&2));
        assert_eq!(store.is_expired("key1"), None);
        assert_eq!(store.get_expiration("key1"), None);
        assert_eq!(store.expiring_len(), 0);
        assert_eq!(store.stats().lazy_expirations, 1);
    }

    #[test]
    fn test_store_len_counts_unpurged_entries() {
        let mut store = CacheStore::new();
        store.set("a".to_string(), 1, past());
        store.set("b".to_string(), 2, SetOptions::default());

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), Some(&2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new();
        store.set("a".to_string(), 1, future());
        store.set("b".to_string(), 2, SetOptions::default());
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.expiring_len(), 0);
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new();
        store.set("key1".to_string(), 1, SetOptions::default());
        store.set("key2".to_string(), 2, future());
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expiring_entries, 1);
    }

    #[test]
    fn test_sample_expiring_only_returns_ttl_keys() {
        let mut store = CacheStore::new();
        for i in 0..10 {
            store.set(format!("ttl:{i}"), i, future());
            store.set(format!("plain:{i}"), i, SetOptions::default());
        }

        let sample = store.sample_expiring(4, &mut rand::rng());
        assert_eq!(sample.len(), 4);
        assert!(sample.iter().all(|key| key.starts_with("ttl:")));

        let everything = store.sample_expiring(50, &mut rand::rng());
        assert_eq!(everything.len(), 10);
    }

    #[test]
    fn test_evict_if_expired() {
        let mut store = CacheStore::new();
        store.set("old".to_string(), 1, SetOptions::ex(100));
        store.set("plain".to_string(), 2, SetOptions::default());

        assert!(!store.evict_if_expired(&"old".to_string(), 100));
        assert!(!store.evict_if_expired(&"plain".to_string(), i64::MAX));
        assert!(store.evict_if_expired(&"old".to_string(), 101));
        assert!(store.is_consistent());
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().swept, 1);
    }
}
