//! ttlkv - An in-process key-value cache
//!
//! Optional schema validation on keys and values, per-entry absolute
//! deadlines, lazy expiration on access and a sampled background sweep that
//! evicts expired entries nobody reads.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheBuilder, SetOptions};
pub use config::{Config, SweepConfig};
pub use error::{CacheError, Result};
