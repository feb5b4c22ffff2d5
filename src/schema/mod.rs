//! Schema Module
//!
//! Optional validation of keys and values before they enter the cache.

mod adapters;
mod validator;

pub use adapters::{FnValidator, JsonSchema};
pub use validator::{Issue, Validation, Validator};
