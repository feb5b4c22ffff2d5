//! Validator Adapters
//!
//! Concrete ways of plugging a schema into the cache.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{Issue, Validation, Validator};

// == Closure Adapter ==
/// Wraps a synchronous closure as a [`Validator`].
///
/// ```
/// use ttlkv::schema::{FnValidator, Issue, Validation};
///
/// let non_empty = FnValidator::new(|key: String| {
///     if key.is_empty() {
///         Validation::Invalid(vec![Issue::new("key must not be empty")])
///     } else {
///         Validation::Valid(key)
///     }
/// });
/// # let _ = non_empty;
/// ```
pub struct FnValidator<F> {
    check: F,
}

impl<F> FnValidator<F> {
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

#[async_trait]
impl<T, F> Validator<T> for FnValidator<F>
where
    T: Send + 'static,
    F: Fn(T) -> Validation<T> + Send + Sync,
{
    async fn validate(&self, input: T) -> Validation<T> {
        (self.check)(input)
    }
}

// == JSON Shape Adapter ==
/// Validates JSON values against the shape of a serde type.
///
/// The input is accepted if it deserializes into `S`; the stored value is `S`
/// serialized back, so unknown fields are dropped and defaults filled in
/// according to `S`'s serde attributes.
pub struct JsonSchema<S> {
    shape: PhantomData<fn() -> S>,
}

impl<S> JsonSchema<S> {
    pub fn new() -> Self {
        Self { shape: PhantomData }
    }
}

impl<S> Default for JsonSchema<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> Validator<Value> for JsonSchema<S>
where
    S: DeserializeOwned + Serialize + Send + 'static,
{
    async fn validate(&self, input: Value) -> Validation<Value> {
        let parsed = match serde_json::from_value::<S>(input) {
            Ok(parsed) => parsed,
            Err(err) => return Validation::Invalid(vec![Issue::new(err.to_string())]),
        };

        match serde_json::to_value(&parsed) {
            Ok(output) => Validation::Valid(output),
            Err(err) => Validation::Invalid(vec![Issue::new(err.to_string())]),
        }
    }
}
