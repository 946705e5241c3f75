//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::{Expiry, MAX_KEY_LENGTH};

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// Any JSON value
    pub value: serde_json::Value,
    /// Seconds to live, or an absolute Unix timestamp; absent or 0 never expires
    #[serde(default)]
    pub ttl: Option<i64>,
    /// Partition to write into; the default partition when absent
    #[serde(default)]
    pub partition: Option<String>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(message) = validate_key(&self.key) {
            return Some(message);
        }
        if self.partition.as_deref() == Some("") {
            return Some("Partition cannot be empty".to_string());
        }
        None
    }

    pub fn expiry(&self) -> Expiry {
        self.ttl.map(Expiry::Raw).unwrap_or_default()
    }
}

/// Shared key rules for every endpoint taking a key.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {MAX_KEY_LENGTH} characters"
        ));
    }
    None
}

/// `?partition=` query accepted by the read, delete, meta and clear endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartitionQuery {
    #[serde(default)]
    pub partition: Option<String>,
}
