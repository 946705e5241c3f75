//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, EntryKind, EntryMeta};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// Partition the key was read from
    pub partition: String,
    /// The stored value, as written
    pub value: serde_json::Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, partition: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            partition: partition.into(),
            value,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Outcome message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Partition the key was written to
    pub partition: String,
    /// `false` when the backend refused the write
    pub stored: bool,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>, partition: impl Into<String>, stored: bool) -> Self {
        let key = key.into();
        let message = if stored {
            format!("Key '{}' set successfully", key)
        } else {
            format!("Key '{}' was not stored", key)
        };
        Self {
            message,
            key,
            partition: partition.into(),
            stored,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
    /// Partition the key was deleted from
    pub partition: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>, partition: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
            partition: partition.into(),
        }
    }
}

/// Response body for POST /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// The cleared partition
    pub partition: String,
    /// Generation now in effect
    pub generation: u64,
}

/// Response body for GET /meta/:key
#[derive(Debug, Clone, Serialize)]
pub struct MetaResponse {
    /// The inspected key
    pub key: String,
    /// Partition the key lives in
    pub partition: String,
    /// Value, fill sentinel or counter
    pub kind: EntryKind,
    /// Unix milliseconds, 0 = never
    pub expires_at: u64,
    /// Milliseconds left, absent for entries that never expire
    pub ttl_remaining_ms: Option<u64>,
}

impl MetaResponse {
    pub fn new(key: impl Into<String>, partition: impl Into<String>, meta: EntryMeta, now_ms: u64) -> Self {
        Self {
            key: key.into(),
            partition: partition.into(),
            kind: meta.kind,
            expires_at: meta.expires_at,
            ttl_remaining_ms: meta.ttl_remaining_ms(now_ms),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Name of the active backend
    pub backend: String,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Writes the backend accepted
    pub writes: u64,
    /// Writes the backend refused
    pub rejected_writes: u64,
    /// Number of delete calls
    pub deletes: u64,
    /// Number of partition clears
    pub clears: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Builds a StatsResponse from the cache counters
    pub fn new(backend: impl Into<String>, stats: &CacheStats) -> Self {
        Self {
            backend: backend.into(),
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            rejected_writes: stats.rejected_writes,
            deletes: stats.deletes,
            clears: stats.clears,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
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
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
