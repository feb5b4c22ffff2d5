//! Response DTOs for the example server
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::schema::Issue;

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /set
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Deadline supplied with this write, if any
    pub ex: Option<i64>,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, ex: Option<i64>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
            ex,
        }
    }
}

/// Response body for DELETE /del/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted", key),
            key,
        }
    }
}

/// Response body for GET /exists/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for GET /size
#[derive(Debug, Clone, Serialize)]
pub struct SizeResponse {
    /// Stored entries, possibly including expired ones not yet purged
    pub size: usize,
}

/// Response body for GET /expiration/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExpirationResponse {
    pub key: String,
    /// Deadline in epoch milliseconds, null when the key has none
    pub ex: Option<i64>,
    /// The same deadline in RFC 3339
    pub expires_at: Option<String>,
    /// Null when the key has no deadline
    pub expired: Option<bool>,
}

impl ExpirationResponse {
    pub fn new(key: impl Into<String>, ex: Option<i64>, expired: Option<bool>) -> Self {
        let expires_at = ex
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true));
        Self {
            key: key.into(),
            ex,
            expires_at,
            expired,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Structured validation issues, omitted when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            issues: Vec::new(),
        }
    }

    pub fn with_issues(error: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            error: error.into(),
            issues,
        }
    }
}
