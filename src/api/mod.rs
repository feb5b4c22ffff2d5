//! API Module
//!
//! A small REST front end over [`crate::cache::Cache`], used by the example
//! server binary.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /exists/:key` - Check for a live entry
//! - `DELETE /del/:key` - Delete a key
//! - `GET /size` - Number of stored entries
//! - `GET /expiration/:key` - Deadline of a key
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
