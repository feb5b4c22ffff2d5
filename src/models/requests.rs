//! Request DTOs for the example server
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::SetOptions;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ex`: Optional absolute deadline in Unix epoch milliseconds
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Absolute expiration instant (epoch ms), not a duration
    #[serde(default)]
    pub ex: Option<i64>,
}

impl SetRequest {
    pub fn options(&self) -> SetOptions {
        SetOptions { ex: self.ex }
    }
}
