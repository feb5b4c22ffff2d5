//! API Handlers
//!
//! HTTP request handlers for the example server. Each one is a thin call into
//! the public cache API.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, ExistsResponse, ExpirationResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse, SizeResponse, StatsResponse,
};
use crate::schema::{FnValidator, Issue, Validation};

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<Cache<String, Value>>,
}

impl AppState {
    pub fn new(cache: Cache<String, Value>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Builds the cache the server uses: keys checked by [`check_key`], any
    /// JSON value accepted, sweep tuned from `config`.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn from_config(config: &Config) -> Self {
        let cache = Cache::builder()
            .key_validator(FnValidator::new(check_key))
            .sweep_config(config.sweep.clone())
            .build();
        Self::new(cache)
    }
}

/// Rejects blank keys and keys longer than [`MAX_KEY_LENGTH`].
pub fn check_key(key: String) -> Validation<String> {
    if key.trim().is_empty() {
        return Validation::Invalid(vec![Issue::new("Key cannot be empty")]);
    }
    if key.len() > MAX_KEY_LENGTH {
        return Validation::Invalid(vec![Issue::new(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ))]);
    }
    Validation::Valid(key)
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SetRequest>, JsonRejection>,
) -> Result<Json<SetResponse>> {
    let Json(req) = payload.map_err(|rejection| CacheError::InvalidRequest(rejection.body_text()))?;
    let options = req.options();

    state.cache.set(req.key.clone(), req.value, options).await?;

    Ok(Json(SetResponse::new(req.key, options.ex)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(key.as_str()).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let exists = state.cache.exists(key.as_str()).await;
    Json(ExistsResponse { key, exists })
}

/// Handler for DELETE /del/:key
///
/// Succeeds whether or not the key was present.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.delete(key.as_str()).await;
    Json(DeleteResponse::new(key))
}

/// Handler for GET /size
pub async fn size_handler(State(state): State<AppState>) -> Json<SizeResponse> {
    Json(SizeResponse {
        size: state.cache.size().await,
    })
}

/// Handler for GET /expiration/:key
pub async fn expiration_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExpirationResponse> {
    let ex = state.cache.get_expiration(key.as_str()).await;
    let expired = state.cache.is_expired(key.as_str()).await;
    Json(ExpirationResponse::new(key, ex, expired))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
