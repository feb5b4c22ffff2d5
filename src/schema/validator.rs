//! Validator Contract
//!
//! The capability a cache needs from a schema: take an input, hand back either
//! a (possibly transformed) output or a list of structured issues.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

// == Issue ==
/// A single structured problem reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Location of the problem inside the input, outermost segment first
    pub path: Vec<String>,
    /// Human readable description
    pub message: String,
}

impl Issue {
    /// Creates an issue that applies to the input as a whole.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Creates an issue located at `path`.
    pub fn at<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

// == Validation ==
/// Outcome of running a validator.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation<T> {
    /// Input accepted; carries the value that should be stored
    Valid(T),
    /// Input rejected; carries at least one issue
    Invalid(Vec<Issue>),
}

impl<T> Validation<T> {
    /// Returns true if the input was accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// Converts into a plain `Result`.
    pub fn into_result(self) -> Result<T, Vec<Issue>> {
        match self {
            Validation::Valid(output) => Ok(output),
            Validation::Invalid(issues) => Err(issues),
        }
    }
}

// == Validator ==
/// Pluggable schema check applied to keys or values before they are stored.
///
/// Implementations may suspend (for example to consult a remote schema
/// registry); the cache awaits the result before touching its maps.
#[async_trait]
pub trait Validator<T: Send + 'static>: Send + Sync {
    /// Checks `input`, returning the value to store or the reasons it was rejected.
    async fn validate(&self, input: T) -> Validation<T>;
}
