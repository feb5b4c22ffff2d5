//! Background Tasks Module
//!
//! # Tasks
//! - Expiration sweeper: samples TTL-bearing keys and evicts expired ones

mod sweeper;

pub use sweeper::spawn_sweeper;
