//! Cache Module
//!
//! The typed cache front: entry envelopes, expiry resolution, partition
//! generations, the fill protocol and the [`CacheEngine`] contract.

mod engine;
mod entry;
mod expiry;
mod front;
mod namespace;
mod stampede;
mod stats;


// Re-export public types
pub use engine::{CacheEngine, Probe};
pub use entry::{CacheEntry, EntryKind, EntryMeta, ENTRY_HEADER_LEN, ENTRY_MAGIC};
pub use expiry::Expiry;
pub use front::{Cache, CacheOptions, PartitionView};
pub use namespace::{NamespaceVersioning, GENERATION_KEY_PREFIX};
pub use stampede::{
    ProducerError, StampedeGuard, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL, DEFAULT_SENTINEL_TTL,
};
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Partition used when none is given
pub const DEFAULT_PARTITION: &str = "default";
