//! Backend Module
//!
//! The physical storage contract consumed by [`crate::cache::Cache`]. A backend
//! moves encoded entries in and out of its substrate and knows nothing about
//! partitions, generations or the fill protocol.
//!
//! # Implementations
//! - [`crate::shm::SharedMemoryStore`] - bounded multi-process arena engine
//! - [`MemoryBackend`] - process-local map with LRU eviction
//! - [`NullBackend`] - stores nothing
//! - [`Chunked`] - splits oversized payloads over any other backend

mod chunked;
mod lru;
mod memory;
mod null;

pub use chunked::{Chunked, DEFAULT_CHUNK_SIZE};
pub use lru::LruTracker;
pub use memory::MemoryBackend;
pub use null::NullBackend;

use crate::cache::CacheEntry;
use crate::error::Result;

/// Substrate-level key/value contract.
///
/// Values are encoded [`CacheEntry`] envelopes. `expires_at` is passed along
/// so substrates with native expiry can use it; 0 means never.
pub trait Backend {
    /// Short name for logs and stats.
    fn name(&self) -> &'static str;

    fn fetch(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Returns `false` when the substrate refused the write.
    fn store(&mut self, key: &str, bytes: Vec<u8>, expires_at: u64) -> Result<bool>;

    fn remove(&mut self, key: &str) -> Result<()>;

    /// Current value of a counter entry, `None` when absent or unreadable.
    fn counter(&mut self, key: &str) -> Result<Option<u64>> {
        Ok(self
            .fetch(key)?
            .and_then(|bytes| CacheEntry::decode(&bytes).ok())
            .and_then(|entry| entry.counter_value()))
    }

    /// Increments a counter, creating it at 1 when absent.
    ///
    /// The default is a plain read-modify-write; substrates that can do better
    /// (a lock, a native INCR) override it.
    fn increment(&mut self, key: &str) -> Result<u64> {
        let next = self.counter(key)?.unwrap_or(0) + 1;
        self.store(key, CacheEntry::counter(next).encode(), 0)?;
        Ok(next)
    }

    /// Current value of a counter, creating it at 1 when absent or zero.
    ///
    /// Shared substrates override this so concurrent first readers agree on
    /// the value they create.
    fn counter_or_init(&mut self, key: &str) -> Result<u64> {
        match self.counter(key)? {
            Some(value) if value > 0 => Ok(value),
            _ => self.increment(key),
        }
    }

    /// Housekeeping pass (expired entry removal). Returns entries removed.
    fn sweep(&mut self) -> Result<usize> {
        Ok(0)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).fetch(key)
    }

    fn store(&mut self, key: &str, bytes: Vec<u8>, expires_at: u64) -> Result<bool> {
        (**self).store(key, bytes, expires_at)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn counter(&mut self, key: &str) -> Result<Option<u64>> {
        (**self).counter(key)
    }

    fn increment(&mut self, key: &str) -> Result<u64> {
        (**self).increment(key)
    }

    fn counter_or_init(&mut self, key: &str) -> Result<u64> {
        (**self).counter_or_init(key)
    }

    fn sweep(&mut self) -> Result<usize> {
        (**self).sweep()
    }
}

/// Type-erased backend chosen at the composition root.
pub type DynBackend = Box<dyn Backend + Send>;
