//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value, optionally with a TTL and partition
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /meta/:key` - Entry kind and expiry without the payload
//! - `POST /clear` - Invalidate a whole partition
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint
//!
//! Keyed endpoints and `/clear` accept `?partition=`.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
