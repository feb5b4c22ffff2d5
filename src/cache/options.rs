//! Write Options
//!
//! Per-write settings accepted by `set`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Set Options ==
/// Options for a single `set` call.
///
/// `ex` is an **absolute** deadline in Unix epoch milliseconds, not a
/// duration. To expire an entry five seconds from now, pass
/// `SetOptions::ex(now_ms() + 5_000)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOptions {
    /// Instant (epoch ms) after which the entry is considered expired
    #[serde(default)]
    pub ex: Option<i64>,
}

impl SetOptions {
    /// Expire at the given epoch-millisecond instant.
    pub fn ex(deadline_ms: i64) -> Self {
        Self {
            ex: Some(deadline_ms),
        }
    }

    /// Expire at the given wall-clock instant.
    pub fn expire_at(deadline: DateTime<Utc>) -> Self {
        Self::ex(deadline.timestamp_millis())
    }
}
