//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::schema::Issue;

// == Validation Target ==
/// Which half of a write was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationTarget {
    Key,
    Value,
}

impl fmt::Display for ValidationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationTarget::Key => f.write_str("key"),
            ValidationTarget::Value => f.write_str("value"),
        }
    }
}

// == Cache Error Enum ==
/// Unified error type for the cache and the HTTP layer built on it.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A configured validator rejected the key or the value of a write
    #[error("Invalid {target}: {}", issues_json(.issues))]
    Validation {
        target: ValidationTarget,
        issues: Vec<Issue>,
    },

    /// Key not found in cache (or logically expired)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

fn issues_json(issues: &[Issue]) -> String {
    serde_json::to_string(issues).unwrap_or_else(|_| format!("{:?}", issues))
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Validation { .. } => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let message = self.to_string();
        let body = match self {
            CacheError::Validation { issues, .. } => ErrorResponse::with_issues(message, issues),
            _ => ErrorResponse::new(message),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_includes_serialized_issues() {
        let err = CacheError::Validation {
            target: ValidationTarget::Value,
            issues: vec![Issue::at(["age"], "expected a number")],
        };
        assert_eq!(
            err.to_string(),
            r#"Invalid value: [{"path":["age"],"message":"expected a number"}]"#
        );
    }

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (
                CacheError::Validation {
                    target: ValidationTarget::Key,
                    issues: vec![Issue::new("empty")],
                },
                StatusCode::BAD_REQUEST,
            ),
            (CacheError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }
}
