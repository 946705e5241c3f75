//! Namespace Versioning
//!
//! Every partition has a generation counter stored in the backend next to the
//! entries. Logical keys embed the generation, so bumping it makes the whole
//! partition unreachable in O(1) without enumerating its keys.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::backend::Backend;
use crate::error::Result;

/// Prefix of the key holding a partition's generation
pub const GENERATION_KEY_PREFIX: &str = "__generation__";

/// Partition -> generation resolution with an optional per-process cache.
///
/// The cache is off by default: a cached generation does not see bumps made
/// by other processes until [`NamespaceVersioning::invalidate`] is called.
#[derive(Debug, Default)]
pub struct NamespaceVersioning {
    cache: Option<HashMap<String, u64>>,
}

impl NamespaceVersioning {
    pub fn new(cache_enabled: bool) -> Self {
        Self {
            cache: cache_enabled.then(HashMap::new),
        }
    }

    pub fn generation_key(partition: &str) -> String {
        format!("{GENERATION_KEY_PREFIX}_{partition}")
    }

    /// Backend key of an entry: `{partition}_{generation}_{key}`
    pub fn logical_key(partition: &str, generation: u64, key: &str) -> String {
        format!("{partition}_{generation}_{key}")
    }

    // == Resolve ==
    /// Current generation of `partition`, allocating generation 1 when none
    /// exists yet.
    pub fn resolve<B: Backend + ?Sized>(&mut self, backend: &mut B, partition: &str) -> Result<u64> {
        if let Some(generation) = self.cache.as_ref().and_then(|c| c.get(partition)) {
            return Ok(*generation);
        }

        let generation = backend.counter_or_init(&Self::generation_key(partition))?;
        debug!(partition, generation, "resolved partition generation");

        if let Some(cache) = self.cache.as_mut() {
            cache.insert(partition.to_string(), generation);
        }
        Ok(generation)
    }

    // == Bump ==
    /// Moves `partition` to a new generation, orphaning everything written
    /// under the previous one.
    pub fn bump<B: Backend + ?Sized>(&mut self, backend: &mut B, partition: &str) -> Result<u64> {
        let generation = backend.increment(&Self::generation_key(partition))?;
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(partition.to_string(), generation);
        }
        info!(partition, generation, "partition cleared");
        Ok(generation)
    }

    pub fn enable_cache(&mut self) {
        if self.cache.is_none() {
            self.cache = Some(HashMap::new());
        }
    }

    pub fn disable_cache(&mut self) {
        self.cache = None;
    }

    pub fn is_cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Forgets the cached generation of `partition`.
    pub fn invalidate(&mut self, partition: &str) {
        if let Some(cache) = self.cache.as_mut() {
            cache.remove(partition);
        }
    }
}
