//! Process-local Backend
//!
//! HashMap storage with LRU tracking and native expiry. Entries live only as
//! long as the owning process.

use std::collections::HashMap;

use tracing::debug;

use super::{Backend, LruTracker};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

#[derive(Debug)]
struct StoredBytes {
    bytes: Vec<u8>,
    /// Unix milliseconds, 0 = never
    expires_at: u64,
}

impl StoredBytes {
    fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expires_at != 0 && now_ms >= self.expires_at
    }
}

// == Memory Backend ==
/// Bounded in-process backend.
///
/// Generation counters are kept apart from regular entries so LRU pressure
/// can never reset a partition's generation.
#[derive(Debug)]
pub struct MemoryBackend<C: Clock = SystemClock> {
    entries: HashMap<String, StoredBytes>,
    counters: HashMap<String, u64>,
    lru: LruTracker,
    max_entries: usize,
    evictions: u64,
    clock: C,
}

impl MemoryBackend<SystemClock> {
    /// Creates a backend holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, SystemClock)
    }
}

impl<C: Clock> MemoryBackend<C> {
    pub fn with_clock(max_entries: usize, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            counters: HashMap::new(),
            lru: LruTracker::new(),
            max_entries: max_entries.max(1),
            evictions: 0,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries dropped because the backend was full.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    fn drop_entry(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
    }
}

impl<C: Clock> Backend for MemoryBackend<C> {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn fetch(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = self.clock.now_ms();
        let expired = match self.entries.get(key) {
            None => return Ok(None),
            Some(stored) => stored.is_expired_at(now),
        };

        if expired {
            self.drop_entry(key);
            return Ok(None);
        }

        self.lru.touch(key);
        Ok(self.entries.get(key).map(|stored| stored.bytes.clone()))
    }

    fn store(&mut self, key: &str, bytes: Vec<u8>, expires_at: u64) -> Result<bool> {
        let is_overwrite = self.entries.contains_key(key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.evictions += 1;
                debug!(key = %evicted, "memory backend evicted least recently used entry");
            }
        }

        self.entries
            .insert(key.to_string(), StoredBytes { bytes, expires_at });
        self.lru.touch(key);
        Ok(true)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.drop_entry(key);
        Ok(())
    }

    fn counter(&mut self, key: &str) -> Result<Option<u64>> {
        Ok(self.counters.get(key).copied())
    }

    fn increment(&mut self, key: &str) -> Result<u64> {
        let value = self.counters.entry(key.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    // == Cleanup Expired ==
    fn sweep(&mut self) -> Result<usize> {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, stored)| stored.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.drop_entry(key);
        }
        Ok(expired.len())
    }
}
