//! Cache Front
//!
//! [`Cache`] layers partitions, expiry and the fill protocol over any
//! [`Backend`]. Entries live under `{partition}_{generation}_{key}`; clearing
//! a partition bumps its generation instead of deleting anything.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::engine::{CacheEngine, Probe};
use super::entry::{CacheEntry, EntryKind, EntryMeta};
use super::expiry::{duration_ms, Expiry};
use super::namespace::NamespaceVersioning;
use super::stampede::StampedeGuard;
use super::stats::CacheStats;
use super::DEFAULT_PARTITION;
use crate::backend::Backend;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

// == Cache Options ==
#[derive(Debug, Clone)]
pub struct CacheOptions {
    pub default_partition: String,
    /// Cache partition generations in-process (see [`NamespaceVersioning`])
    pub namespace_cache: bool,
    pub stampede: StampedeGuard,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            default_partition: DEFAULT_PARTITION.to_string(),
            namespace_cache: false,
            stampede: StampedeGuard::default(),
        }
    }
}

// == Cache ==
pub struct Cache<B: Backend, C: Clock = SystemClock> {
    backend: B,
    clock: C,
    namespaces: NamespaceVersioning,
    default_partition: String,
    guard: StampedeGuard,
    stats: CacheStats,
}

impl<B: Backend> Cache<B, SystemClock> {
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, SystemClock, CacheOptions::default())
    }
}

impl<B: Backend, C: Clock> Cache<B, C> {
    pub fn with_options(backend: B, clock: C, options: CacheOptions) -> Self {
        Self {
            backend,
            clock,
            namespaces: NamespaceVersioning::new(options.namespace_cache),
            default_partition: options.default_partition,
            guard: options.stampede,
            stats: CacheStats::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn default_partition(&self) -> &str {
        &self.default_partition
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceVersioning {
        &mut self.namespaces
    }

    /// A [`CacheEngine`] scoped to `name` instead of the default partition.
    pub fn partition(&mut self, name: impl Into<String>) -> PartitionView<'_, B, C> {
        PartitionView {
            cache: self,
            partition: name.into(),
        }
    }

    pub fn generation(&mut self, partition: &str) -> Result<u64> {
        self.namespaces.resolve(&mut self.backend, partition)
    }

    /// Orphans every entry of `partition`. Returns the new generation.
    pub fn clear_partition(&mut self, partition: &str) -> Result<u64> {
        let generation = self.namespaces.bump(&mut self.backend, partition)?;
        self.stats.record_clear();
        Ok(generation)
    }

    /// Header of the entry stored for `key` in the default partition.
    pub fn meta(&mut self, key: &str) -> Result<Option<EntryMeta>> {
        let partition = self.default_partition.clone();
        self.meta_in(&partition, key)
    }

    /// Backend housekeeping; returns entries removed.
    pub fn sweep(&mut self) -> Result<usize> {
        self.backend.sweep()
    }

    fn logical_key(&mut self, partition: &str, key: &str) -> Result<String> {
        let generation = self.namespaces.resolve(&mut self.backend, partition)?;
        Ok(NamespaceVersioning::logical_key(partition, generation, key))
    }

    // == Partition-scoped Operations ==
    fn probe_in<V: DeserializeOwned>(&mut self, partition: &str, key: &str) -> Result<Probe<V>> {
        let logical = self.logical_key(partition, key)?;
        let Some(bytes) = self.backend.fetch(&logical)? else {
            self.stats.record_miss();
            return Ok(Probe::Miss);
        };

        let entry = match CacheEntry::decode(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %logical, error = %e, "unreadable entry treated as a miss");
                self.stats.record_miss();
                return Ok(Probe::Miss);
            }
        };

        if entry.is_expired_at(self.clock.now_ms()) {
            self.backend.remove(&logical)?;
            debug!(key = %logical, "removed expired entry");
            self.stats.record_miss();
            return Ok(Probe::Miss);
        }

        let probe = match entry.kind {
            EntryKind::Filling => Probe::Filling,
            EntryKind::Counter => Probe::Miss,
            EntryKind::Value => match serde_json::from_slice(&entry.data) {
                Ok(value) => Probe::Ready(value),
                Err(e) => {
                    warn!(key = %logical, error = %e, "entry payload does not match requested type");
                    Probe::Miss
                }
            },
        };

        match probe {
            Probe::Ready(_) => self.stats.record_hit(),
            _ => self.stats.record_miss(),
        }
        Ok(probe)
    }

    fn set_in<V: Serialize + ?Sized>(
        &mut self,
        partition: &str,
        key: &str,
        value: &V,
        expires: Expiry,
    ) -> Result<bool> {
        let data = serde_json::to_vec(value)?;
        let logical = self.logical_key(partition, key)?;
        let now = self.clock.now_ms();
        let expires_at = expires.resolve(now);

        // Already in the past: the write behaves like an immediate expiry
        if expires_at != 0 && expires_at <= now {
            self.backend.remove(&logical)?;
            self.stats.record_write(true);
            return Ok(true);
        }

        let stored = self
            .backend
            .store(&logical, CacheEntry::value(data, expires_at).encode(), expires_at)?;
        if !stored {
            warn!(key = %logical, backend = self.backend.name(), "backend refused write");
        }
        self.stats.record_write(stored);
        Ok(stored)
    }

    fn reserve_in(&mut self, partition: &str, key: &str, ttl: Duration) -> Result<()> {
        let logical = self.logical_key(partition, key)?;
        let expires_at = self
            .clock
            .now_ms()
            .saturating_add(duration_ms(ttl))
            .max(1);
        let stored = self
            .backend
            .store(&logical, CacheEntry::filling(expires_at).encode(), expires_at)?;
        if !stored {
            warn!(key = %logical, "fill sentinel not stored, concurrent callers will not wait");
        }
        Ok(())
    }

    fn delete_in(&mut self, partition: &str, key: &str) -> Result<()> {
        let logical = self.logical_key(partition, key)?;
        self.backend.remove(&logical)?;
        self.stats.record_delete();
        Ok(())
    }

    fn meta_in(&mut self, partition: &str, key: &str) -> Result<Option<EntryMeta>> {
        let logical = self.logical_key(partition, key)?;
        let now = self.clock.now_ms();
        Ok(self
            .backend
            .fetch(&logical)?
            .and_then(|bytes| EntryMeta::peek(&bytes).ok())
            .filter(|meta| !meta.is_expired_at(now)))
    }
}

impl<B: Backend, C: Clock> CacheEngine for Cache<B, C> {
    fn probe<V: DeserializeOwned>(&mut self, key: &str) -> Result<Probe<V>> {
        let partition = self.default_partition.clone();
        self.probe_in(&partition, key)
    }

    fn set<V: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &V,
        expires: impl Into<Expiry>,
    ) -> Result<bool> {
        let partition = self.default_partition.clone();
        self.set_in(&partition, key, value, expires.into())
    }

    fn reserve(&mut self, key: &str, ttl: Duration) -> Result<()> {
        let partition = self.default_partition.clone();
        self.reserve_in(&partition, key, ttl)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let partition = self.default_partition.clone();
        self.delete_in(&partition, key)
    }

    fn clear(&mut self) -> Result<()> {
        let partition = self.default_partition.clone();
        self.clear_partition(&partition).map(|_| ())
    }

    fn stampede_guard(&self) -> StampedeGuard {
        self.guard
    }
}

impl<B: Backend, C: Clock> std::fmt::Debug for Cache<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("backend", &self.backend.name())
            .field("default_partition", &self.default_partition)
            .field("stats", &self.stats)
            .finish()
    }
}

// == Partition View ==
/// Borrowed [`Cache`] bound to a single partition.
pub struct PartitionView<'a, B: Backend, C: Clock> {
    cache: &'a mut Cache<B, C>,
    partition: String,
}

impl<B: Backend, C: Clock> PartitionView<'_, B, C> {
    pub fn name(&self) -> &str {
        &self.partition
    }

    pub fn generation(&mut self) -> Result<u64> {
        self.cache.generation(&self.partition)
    }

    pub fn meta(&mut self, key: &str) -> Result<Option<EntryMeta>> {
        self.cache.meta_in(&self.partition, key)
    }
}

impl<B: Backend, C: Clock> CacheEngine for PartitionView<'_, B, C> {
    fn probe<V: DeserializeOwned>(&mut self, key: &str) -> Result<Probe<V>> {
        self.cache.probe_in(&self.partition, key)
    }

    fn set<V: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &V,
        expires: impl Into<Expiry>,
    ) -> Result<bool> {
        self.cache.set_in(&self.partition, key, value, expires.into())
    }

    fn reserve(&mut self, key: &str, ttl: Duration) -> Result<()> {
        self.cache.reserve_in(&self.partition, key, ttl)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.cache.delete_in(&self.partition, key)
    }

    fn clear(&mut self) -> Result<()> {
        self.cache.clear_partition(&self.partition).map(|_| ())
    }

    fn stampede_guard(&self) -> StampedeGuard {
        self.cache.guard
    }
}
