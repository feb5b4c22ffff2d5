//! Cache Module
//!
//! Provides in-memory caching with lazy and sampled TTL expiration.

mod expiration;
mod handle;
mod options;
mod stats;
mod store;


// Re-export public types
pub use expiration::{active_sweep, is_expired_at, now_ms, sample_size, sweep_with, SweepReport};
pub use handle::{Cache, CacheBuilder};
pub use options::SetOptions;
pub use stats::CacheStats;
pub use store::CacheStore;
