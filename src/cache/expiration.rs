//! Expiration Engine
//!
//! Two paths keep expired entries from lingering:
//!
//! - **Lazy**: every read checks the single key it touches and purges it if
//!   its deadline has passed.
//! - **Active**: a periodic sweep samples a fraction of the TTL-bearing keys,
//!   evicts the expired ones, and samples again straight away while the share
//!   of expired keys in the sample stays at or above a threshold.
//!
//! Both paths use the same comparison: an entry is expired once `now` is
//! strictly greater than its deadline. At `now == deadline` it is still live.

use std::hash::Hash;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tracing::trace;

use crate::cache::CacheStore;
use crate::config::SweepConfig;

/// Returns the current Unix timestamp in milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// == Lazy Check ==
/// Decides whether an entry with `deadline` is expired at `now`.
///
/// `None` means the entry has no deadline at all, which is distinct from
/// `Some(false)` (has a deadline that has not passed yet).
pub fn is_expired_at(deadline: Option<i64>, now: i64) -> Option<bool> {
    deadline.map(|deadline| now > deadline)
}

// == Sample Size ==
/// Number of keys to sample from a TTL-bearing population.
///
/// Rounds up so that small populations are still sampled; zero only when
/// there is nothing to sample.
pub fn sample_size(population: usize, fraction: f64) -> usize {
    if population == 0 {
        return 0;
    }
    ((population as f64 * fraction).ceil() as usize).clamp(1, population)
}

// == Sweep Report ==
/// Outcome of one active sweep (which may span several sampling rounds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Sampling rounds performed
    pub rounds: usize,
    /// Keys inspected across all rounds
    pub sampled: usize,
    /// Keys evicted across all rounds
    pub evicted: usize,
}

// == Active Sweep ==
/// Runs one active sweep against `store` using the thread RNG and wall clock.
pub fn active_sweep<K, V>(store: &mut CacheStore<K, V>, config: &SweepConfig) -> SweepReport
where
    K: Eq + Hash + Clone,
{
    sweep_with(store, config, &mut rand::rng(), now_ms)
}

/// Runs one active sweep with an explicit RNG and clock.
///
/// Each round reads a fresh timestamp from `clock`. A round that evicts
/// nothing always ends the sweep, so the number of rounds is bounded by the
/// TTL-bearing population plus one regardless of `hit_threshold`.
pub fn sweep_with<K, V, R, C>(
    store: &mut CacheStore<K, V>,
    config: &SweepConfig,
    rng: &mut R,
    mut clock: C,
) -> SweepReport
where
    K: Eq + Hash + Clone,
    R: Rng + ?Sized,
    C: FnMut() -> i64,
{
    let mut report = SweepReport::default();

    loop {
        let amount = sample_size(store.expiring_len(), config.sample_fraction);
        if amount == 0 {
            break;
        }

        let now = clock();
        let sample = store.sample_expiring(amount, rng);

        let mut hits = 0;
        for key in &sample {
            if store.evict_if_expired(key, now) {
                hits += 1;
            }
        }

        report.rounds += 1;
        report.sampled += sample.len();
        report.evicted += hits;
        store.stats_mut().record_sweep_round();

        let hit_ratio = hits as f64 / sample.len() as f64;
        trace!(
            sampled = sample.len(),
            hits = hits,
            hit_ratio = hit_ratio,
            "Sweep round finished"
        );

        if hits == 0 || hit_ratio < config.hit_threshold {
            break;
        }
    }

    report
}
