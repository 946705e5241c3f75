//! Cache Entry Module
//!
//! Defines the persisted envelope every backend stores: a small binary header
//! (magic, kind, absolute expiry) followed by the opaque payload.
//!
//! ```text
//! [0xCA][kind: u8][expires_at: u64 BE][data ...]
//! ```

use serde::Serialize;

use crate::error::{CacheError, Result};

// == Layout Constants ==
/// First byte of every encoded entry
pub const ENTRY_MAGIC: u8 = 0xCA;

/// Bytes preceding the payload
pub const ENTRY_HEADER_LEN: usize = 10;

// == Entry Kind ==
/// What an entry's payload means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EntryKind {
    /// JSON-encoded caller value
    Value = 1,
    /// Stampede sentinel: a fill is in progress
    Filling = 2,
    /// Generation counter, ASCII decimal payload
    Counter = 3,
}

impl EntryKind {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(EntryKind::Value),
            2 => Some(EntryKind::Filling),
            3 => Some(EntryKind::Counter),
            _ => None,
        }
    }
}

// == Entry Meta ==
/// Header-only view of an encoded entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryMeta {
    pub kind: EntryKind,
    /// Absolute expiry in Unix milliseconds, 0 = never
    pub expires_at: u64,
}

impl EntryMeta {
    /// Reads the header without touching the payload.
    pub fn peek(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ENTRY_HEADER_LEN {
            return Err(CacheError::CorruptEntry(format!(
                "entry of {} bytes is shorter than its header",
                bytes.len()
            )));
        }
        if bytes[0] != ENTRY_MAGIC {
            return Err(CacheError::CorruptEntry(format!(
                "bad magic byte {:#04x}",
                bytes[0]
            )));
        }
        let kind = EntryKind::from_byte(bytes[1])
            .ok_or_else(|| CacheError::CorruptEntry(format!("unknown kind {}", bytes[1])))?;
        let mut expiry = [0u8; 8];
        expiry.copy_from_slice(&bytes[2..ENTRY_HEADER_LEN]);

        Ok(Self {
            kind,
            expires_at: u64::from_be_bytes(expiry),
        })
    }

    /// An entry is expired once `now >= expires_at`; zero never expires.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expires_at != 0 && now_ms >= self.expires_at
    }

    /// Remaining lifetime in milliseconds, `None` for entries that never expire.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        if self.expires_at == 0 {
            None
        } else {
            Some(self.expires_at.saturating_sub(now_ms))
        }
    }
}

// == Cache Entry ==
/// A decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub kind: EntryKind,
    /// Absolute expiry in Unix milliseconds, 0 = never
    pub expires_at: u64,
    pub data: Vec<u8>,
}

impl CacheEntry {
    pub fn value(data: Vec<u8>, expires_at: u64) -> Self {
        Self {
            kind: EntryKind::Value,
            expires_at,
            data,
        }
    }

    /// The "fill in progress" placeholder.
    pub fn filling(expires_at: u64) -> Self {
        Self {
            kind: EntryKind::Filling,
            expires_at,
            data: Vec::new(),
        }
    }

    pub fn counter(value: u64) -> Self {
        Self {
            kind: EntryKind::Counter,
            expires_at: 0,
            data: value.to_string().into_bytes(),
        }
    }

    pub fn meta(&self) -> EntryMeta {
        EntryMeta {
            kind: self.kind,
            expires_at: self.expires_at,
        }
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.meta().is_expired_at(now_ms)
    }

    /// Parses the payload of a counter entry.
    pub fn counter_value(&self) -> Option<u64> {
        if self.kind != EntryKind::Counter {
            return None;
        }
        std::str::from_utf8(&self.data).ok()?.parse().ok()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ENTRY_HEADER_LEN + self.data.len());
        out.push(ENTRY_MAGIC);
        out.push(self.kind as u8);
        out.extend_from_slice(&self.expires_at.to_be_bytes());
        out.extend_from_slice(&self.data);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let meta = EntryMeta::peek(bytes)?;
        Ok(Self {
            kind: meta.kind,
            expires_at: meta.expires_at,
            data: bytes[ENTRY_HEADER_LEN..].to_vec(),
        })
    }
}
