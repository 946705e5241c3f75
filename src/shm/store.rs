//! Shared Memory Store
//!
//! Bounded multi-process key/value engine over a single [`Arena`]. All
//! mutation of the [`MasterRecord`] (slot allocation, size accounting,
//! eviction) happens under one process-shared lock; slot reads are unguarded.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::arena::{Arena, FileArena, MemoryArena, MemorySegment};
use super::lock::{FileLock, MemoryLock, RawLock, ReentrantLock};
use super::master::{MasterRecord, FIRST_DATA_SLOT, MASTER_SLOT};
use crate::backend::Backend;
use crate::cache::{CacheEntry, EntryKind, EntryMeta};
use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, Result};

/// Default share of capacity above which writes trigger eviction
pub const DEFAULT_HIGH_WATER_RATIO: f64 = 0.7;

/// Default highest slot id scanned by [`SharedMemoryStore::reset`]
pub const DEFAULT_RESET_CEILING: u32 = 4096;

// == Store Options ==
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreOptions {
    /// Fraction of capacity treated as the high-water mark
    pub high_water_ratio: f64,
    /// Lower bound on the slot ids cleared by `reset`
    pub reset_ceiling: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            high_water_ratio: DEFAULT_HIGH_WATER_RATIO,
            reset_ceiling: DEFAULT_RESET_CEILING,
        }
    }
}

// == Eviction Report ==
/// Outcome of one eviction or sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvictionReport {
    /// Mappings dropped because their slot no longer existed
    pub repaired: usize,
    /// Expired or undecodable entries removed
    pub expired: usize,
    /// Live entries evicted to get under the low-water target
    pub evicted: usize,
}

impl EvictionReport {
    pub fn removed(&self) -> usize {
        self.expired + self.evicted
    }
}

struct Candidate {
    key: String,
    slot: u32,
    len: u64,
    /// Remaining lifetime, `u64::MAX` for entries that never expire
    remaining: u64,
}

// == Shared Memory Store ==
pub struct SharedMemoryStore<A: Arena, L: RawLock, C: Clock = SystemClock> {
    arena: A,
    lock: ReentrantLock<L>,
    clock: C,
    /// Local copy of the shared record; reloaded before every mutation
    master: MasterRecord,
    options: StoreOptions,
    evictions: u64,
}

impl SharedMemoryStore<FileArena, FileLock, SystemClock> {
    /// Attaches to (or creates) the file arena `id` under `root`.
    pub fn open(
        root: impl AsRef<std::path::Path>,
        id: u32,
        capacity: usize,
        options: StoreOptions,
    ) -> Result<Self> {
        let arena = FileArena::attach(root, id, capacity)?;
        let lock = arena.lock()?;
        Self::attach(arena, lock, SystemClock, options)
    }
}

impl<C: Clock> SharedMemoryStore<MemoryArena, MemoryLock, C> {
    /// Attaches a new handle to an in-process segment.
    pub fn in_memory(segment: &MemorySegment, clock: C, options: StoreOptions) -> Result<Self> {
        Self::attach(segment.arena(), segment.lock(), clock, options)
    }
}

impl<A: Arena, L: RawLock, C: Clock> SharedMemoryStore<A, L, C> {
    // == Attach ==
    /// Loads the master record (a missing or corrupt one starts empty) and
    /// evicts right away when the arena is already above the high-water mark.
    pub fn attach(arena: A, lock: L, clock: C, options: StoreOptions) -> Result<Self> {
        let mut store = Self {
            arena,
            lock: ReentrantLock::new(lock),
            clock,
            master: MasterRecord::empty(),
            options,
            evictions: 0,
        };

        store.reload_master()?;
        debug!(
            keys = store.master.keys.len(),
            used = store.master.used_size,
            capacity = store.capacity(),
            "attached shared store"
        );

        if store.master.used_size > store.high_water_mark() {
            info!(
                used = store.master.used_size,
                high_water = store.high_water_mark(),
                "arena above high-water mark on attach, evicting"
            );
            store.evict()?;
        }
        Ok(store)
    }

    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub fn high_water_mark(&self) -> u64 {
        (self.capacity() as f64 * self.options.high_water_ratio) as u64
    }

    /// Size accounted in the local copy of the master record.
    pub fn used_size(&self) -> u64 {
        self.master.used_size
    }

    pub fn len(&self) -> usize {
        self.master.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.master.keys.is_empty()
    }

    pub fn master(&self) -> &MasterRecord {
        &self.master
    }

    /// Entries evicted by this handle since attach.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    // == Locking ==
    /// Returns `false` when this handle already held the lock.
    pub fn acquire(&mut self) -> Result<bool> {
        self.lock.acquire()
    }

    pub fn release(&mut self) -> Result<()> {
        self.lock.release()
    }

    /// Runs `op` holding the lock; a nested call reuses the outer acquisition.
    fn with_lock<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let fresh = self.acquire()?;
        let result = op(self);
        if fresh {
            self.release()?;
        }
        result
    }

    // == Master Record ==
    fn reload_master(&mut self) -> Result<()> {
        self.master = match self.arena.read(MASTER_SLOT)? {
            None => MasterRecord::empty(),
            Some(bytes) => MasterRecord::decode(&bytes).unwrap_or_else(|| {
                warn!("master record is corrupt, starting from an empty one");
                MasterRecord::empty()
            }),
        };
        Ok(())
    }

    fn persist_master(&mut self) -> Result<()> {
        self.with_lock(|store| {
            let bytes = store.master.encode();
            if store.arena.write(MASTER_SLOT, &bytes)? {
                Ok(())
            } else {
                Err(CacheError::Internal(
                    "arena has no room left for the master record".to_string(),
                ))
            }
        })
    }

    // == Resolve Slot ==
    /// Looks up the slot for `key`, allocating one under the lock when
    /// `create` is set.
    pub fn resolve_slot(&mut self, key: &str, create: bool) -> Result<Option<u32>> {
        if let Some(slot) = self.master.slot(key) {
            return Ok(Some(slot));
        }
        self.reload_master()?;
        if let Some(slot) = self.master.slot(key) {
            return Ok(Some(slot));
        }
        if !create {
            return Ok(None);
        }

        self.with_lock(|store| {
            store.reload_master()?;
            if let Some(slot) = store.master.slot(key) {
                return Ok(Some(slot));
            }
            let slot = store.master.allocate(key);
            store.persist_master()?;
            Ok(Some(slot))
        })
    }

    fn mapped_len(&self, key: &str) -> Result<u64> {
        match self.master.slot(key) {
            Some(slot) => Ok(self.arena.slot_len(slot)?.unwrap_or(0) as u64),
            None => Ok(0),
        }
    }

    // == Get ==
    /// Reads the raw bytes for `key` without taking the lock. A slot removed
    /// by a concurrent evictor reads as a miss.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(slot) = self.resolve_slot(key, false)? else {
            return Ok(None);
        };
        if let Some(bytes) = self.arena.read(slot)? {
            return Ok(Some(bytes));
        }

        // Local mapping may be stale: the key could have been deleted and
        // written again under a new slot.
        self.reload_master()?;
        match self.master.slot(key) {
            Some(current) if current != slot => self.arena.read(current),
            _ => Ok(None),
        }
    }

    // == Set ==
    /// Writes `bytes` under `key`, evicting first when the write would cross
    /// the high-water mark. Returns `false` when the arena refused the bytes.
    pub fn set(&mut self, key: &str, bytes: &[u8]) -> Result<bool> {
        self.with_lock(|store| {
            store.reload_master()?;
            let len = bytes.len() as u64;
            let previous = store.mapped_len(key)?;
            let projected = store.master.used_size.saturating_sub(previous) + len;

            if projected > store.high_water_mark() {
                debug!(
                    key,
                    projected,
                    high_water = store.high_water_mark(),
                    "write crosses high-water mark"
                );
                store.evict()?;
            }

            // Eviction may have taken the key's previous value with it.
            let previous = store.mapped_len(key)?;
            let slot = store
                .resolve_slot(key, true)?
                .ok_or_else(|| CacheError::Internal(format!("no slot allocated for {key}")))?;

            if !store.arena.write(slot, bytes)? {
                warn!(key, len, "arena refused write");
                return Ok(false);
            }

            store.master.used_size = store.master.used_size.saturating_sub(previous) + len;
            store.persist_master()?;
            Ok(true)
        })
    }

    // == Delete ==
    pub fn delete(&mut self, key: &str) -> Result<()> {
        self.with_lock(|store| {
            store.reload_master()?;
            let Some(slot) = store.master.keys.remove(key) else {
                return Ok(());
            };
            let len = store.arena.slot_len(slot)?.unwrap_or(0) as u64;
            store.arena.remove(slot)?;
            store.master.used_size = store.master.used_size.saturating_sub(len);
            store.persist_master()
        })
    }

    // == Evict ==
    /// Full eviction pass: repair, drop expired entries, then evict the
    /// soonest-expiring entries until usage is below half the capacity.
    pub fn evict(&mut self) -> Result<EvictionReport> {
        self.with_lock(|store| {
            store.reload_master()?;
            store.evict_locked(true)
        })
    }

    /// Housekeeping pass: repair and expired-entry removal, plus eviction
    /// only when usage is above the high-water mark.
    pub fn sweep(&mut self) -> Result<EvictionReport> {
        self.with_lock(|store| {
            store.reload_master()?;
            let over = store.master.used_size > store.high_water_mark();
            store.evict_locked(over)
        })
    }

    fn evict_locked(&mut self, enforce_target: bool) -> Result<EvictionReport> {
        let now = self.clock.now_ms();
        let mut report = EvictionReport::default();
        let mut live = Vec::new();
        let mut used = 0u64;

        let mapped: Vec<(String, u32)> = self
            .master
            .keys
            .iter()
            .map(|(key, slot)| (key.clone(), *slot))
            .collect();

        for (key, slot) in mapped {
            let Some(bytes) = self.arena.read(slot)? else {
                self.master.keys.remove(&key);
                report.repaired += 1;
                continue;
            };

            match EntryMeta::peek(&bytes) {
                Ok(meta) if !meta.is_expired_at(now) => {
                    used += bytes.len() as u64;
                    // Generation counters are pinned: losing one would let a
                    // cleared partition's entries resurface.
                    if meta.kind != EntryKind::Counter {
                        live.push(Candidate {
                            key,
                            slot,
                            len: bytes.len() as u64,
                            remaining: meta.ttl_remaining_ms(now).unwrap_or(u64::MAX),
                        });
                    }
                }
                _ => {
                    self.arena.remove(slot)?;
                    self.master.keys.remove(&key);
                    report.expired += 1;
                }
            }
        }

        if used != self.master.used_size {
            debug!(
                accounted = self.master.used_size,
                scanned = used,
                "size accounting corrected by scan"
            );
        }
        self.master.used_size = used;

        if enforce_target {
            let target = (self.capacity() / 2) as u64;
            // Longest-lived first, so popping yields the soonest to expire.
            live.sort_by(|a, b| b.remaining.cmp(&a.remaining));

            while self.master.used_size >= target {
                let Some(victim) = live.pop() else {
                    break;
                };
                self.arena.remove(victim.slot)?;
                self.master.keys.remove(&victim.key);
                self.master.used_size = self.master.used_size.saturating_sub(victim.len);
                report.evicted += 1;
            }
        }

        self.persist_master()?;
        self.evictions += report.evicted as u64;

        if report.removed() > 0 || report.repaired > 0 {
            info!(
                repaired = report.repaired,
                expired = report.expired,
                evicted = report.evicted,
                used = self.master.used_size,
                "eviction pass complete"
            );
        }
        Ok(report)
    }

    // == Increment ==
    /// Locked read-increment-write of a counter entry.
    pub fn increment(&mut self, key: &str) -> Result<u64> {
        self.with_lock(|store| {
            let next = store.read_counter(key)?.unwrap_or(0) + 1;
            store.write_counter(key, next)?;
            Ok(next)
        })
    }

    /// Reads a counter, creating it at 1 under the same lock hold when it is
    /// absent, so handles racing on a fresh key all see 1.
    pub fn counter_or_init(&mut self, key: &str) -> Result<u64> {
        self.with_lock(|store| match store.read_counter(key)? {
            Some(value) if value > 0 => Ok(value),
            _ => {
                store.write_counter(key, 1)?;
                Ok(1)
            }
        })
    }

    fn read_counter(&mut self, key: &str) -> Result<Option<u64>> {
        Ok(self
            .get(key)?
            .and_then(|bytes| CacheEntry::decode(&bytes).ok())
            .and_then(|entry| entry.counter_value()))
    }

    fn write_counter(&mut self, key: &str, value: u64) -> Result<()> {
        if !self.set(key, &CacheEntry::counter(value).encode())? {
            return Err(CacheError::Internal(format!(
                "arena refused counter write for {key}"
            )));
        }
        Ok(())
    }

    // == Reset ==
    /// Administrative recovery: removes every slot up to the allocation
    /// ceiling and starts a fresh master record.
    pub fn reset(&mut self) -> Result<()> {
        self.with_lock(|store| {
            store.reload_master()?;
            let ceiling = store.master.next_slot_id.max(store.options.reset_ceiling);
            for slot in FIRST_DATA_SLOT..=ceiling {
                store.arena.remove(slot)?;
            }
            store.arena.remove(MASTER_SLOT)?;
            store.master = MasterRecord::empty();
            store.persist_master()?;
            warn!(ceiling, "shared store reset");
            Ok(())
        })
    }
}

impl<A: Arena, L: RawLock, C: Clock> Backend for SharedMemoryStore<A, L, C> {
    fn name(&self) -> &'static str {
        "shm"
    }

    fn fetch(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        self.get(key)
    }

    fn store(&mut self, key: &str, bytes: Vec<u8>, _expires_at: u64) -> Result<bool> {
        self.set(key, &bytes)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.delete(key)
    }

    fn increment(&mut self, key: &str) -> Result<u64> {
        SharedMemoryStore::increment(self, key)
    }

    fn counter_or_init(&mut self, key: &str) -> Result<u64> {
        SharedMemoryStore::counter_or_init(self, key)
    }

    fn sweep(&mut self) -> Result<usize> {
        Ok(SharedMemoryStore::sweep(self)?.removed())
    }
}

impl<A: Arena, L: RawLock, C: Clock> std::fmt::Debug for SharedMemoryStore<A, L, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedMemoryStore")
            .field("capacity", &self.capacity())
            .field("keys", &self.master.keys.len())
            .field("used_size", &self.master.used_size)
            .field("next_slot_id", &self.master.next_slot_id)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::io;

    const NOW_MS: u64 = 1_700_000_000_000;

    type TestStore = SharedMemoryStore<MemoryArena, MemoryLock, ManualClock>;

    fn store(capacity: usize) -> (TestStore, MemorySegment, ManualClock) {
        let segment = MemorySegment::new(capacity);
        let clock = ManualClock::new(NOW_MS);
        let store =
            SharedMemoryStore::in_memory(&segment, clock.clone(), StoreOptions::default()).unwrap();
        (store, segment, clock)
    }

    /// An encoded entry of exactly `total` bytes expiring in `ttl_secs`.
    fn entry(total: usize, ttl_secs: u64) -> Vec<u8> {
        let data = vec![b'x'; total - crate::cache::ENTRY_HEADER_LEN];
        CacheEntry::value(data, NOW_MS + ttl_secs * 1000).encode()
    }

    #[test]
    fn test_set_and_get() {
        let (mut store, _, _) = store(10_000);

        assert!(store.set("k", &entry(50, 60)).unwrap());
        assert_eq!(store.get("k").unwrap(), Some(entry(50, 60)));
        assert_eq!(store.get("missing").unwrap(), None);
        assert_eq!(store.used_size(), 50);
    }

    #[test]
    fn test_overwrite_accounts_delta() {
        let (mut store, _, _) = store(10_000);

        store.set("k", &entry(100, 60)).unwrap();
        store.set("k", &entry(40, 60)).unwrap();

        assert_eq!(store.used_size(), 40);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").unwrap(), Some(entry(40, 60)));
    }

    #[test]
    fn test_delete_subtracts_size() {
        let (mut store, _, _) = store(10_000);

        store.set("a", &entry(30, 60)).unwrap();
        store.set("b", &entry(20, 60)).unwrap();
        store.delete("a").unwrap();
        store.delete("never-set").unwrap();

        assert_eq!(store.used_size(), 20);
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_slot_ids_are_monotonic() {
        let (mut store, _, _) = store(10_000);

        store.set("a", &entry(20, 60)).unwrap();
        let first = store.master().slot("a").unwrap();
        store.delete("a").unwrap();
        store.set("a", &entry(20, 60)).unwrap();

        assert_eq!(first, FIRST_DATA_SLOT);
        assert!(store.master().slot("a").unwrap() > first);
    }

    #[test]
    fn test_eviction_prefers_soonest_expiry() {
        let (mut store, _, _) = store(1000);
        assert_eq!(store.high_water_mark(), 700);

        store.set("A", &entry(400, 100)).unwrap();
        store.set("B", &entry(400, 10)).unwrap();
        assert_eq!(store.used_size(), 800);

        store.set("C", &entry(300, 50)).unwrap();

        assert_eq!(store.get("B").unwrap(), None, "soonest expiry evicted");
        assert!(store.get("A").unwrap().is_some());
        assert!(store.get("C").unwrap().is_some());
        assert_eq!(store.used_size(), 700);
        assert_eq!(store.evictions(), 1);
    }

    #[test]
    fn test_eviction_pass_gets_below_half_capacity() {
        let (mut store, _, _) = store(1000);

        store.set("A", &entry(400, 100)).unwrap();
        store.set("B", &entry(400, 10)).unwrap();
        let report = store.evict().unwrap();

        assert_eq!(report.evicted, 1);
        assert!(store.used_size() <= 500);
    }

    #[test]
    fn test_eviction_drops_expired_first() {
        let (mut store, _, clock) = store(10_000);

        store.set("short", &entry(100, 1)).unwrap();
        store.set("long", &entry(100, 600)).unwrap();
        clock.advance_secs(2);

        let report = store.evict().unwrap();
        assert_eq!(report.expired, 1);
        assert_eq!(report.evicted, 0, "already below half capacity");
        assert_eq!(store.used_size(), 100);
    }

    #[test]
    fn test_eviction_keeps_counters() {
        let (mut store, _, _) = store(1000);

        store.increment("gen").unwrap();
        store.set("A", &entry(400, 100)).unwrap();
        store.set("B", &entry(400, 10)).unwrap();

        assert_eq!(store.increment("gen").unwrap(), 2);
        assert_eq!(store.get("B").unwrap(), None);
    }

    #[test]
    fn test_eviction_repairs_dangling_mappings() {
        let (mut store, segment, _) = store(10_000);

        store.set("a", &entry(100, 60)).unwrap();
        let slot = store.master().slot("a").unwrap();
        segment.arena().remove(slot).unwrap();

        let report = store.evict().unwrap();
        assert_eq!(report.repaired, 1);
        assert_eq!(store.used_size(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_entries_are_removed_by_sweep() {
        let (mut store, _, _) = store(10_000);

        store.set("garbage", b"not an envelope").unwrap();
        store.set("good", &entry(50, 60)).unwrap();

        assert_eq!(SharedMemoryStore::sweep(&mut store).unwrap().expired, 1);
        assert_eq!(store.get("garbage").unwrap(), None);
        assert!(store.get("good").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_master_record_self_heals() {
        let segment = MemorySegment::new(10_000);
        segment.arena().write(MASTER_SLOT, b"{broken").unwrap();

        let store = SharedMemoryStore::in_memory(
            &segment,
            ManualClock::new(NOW_MS),
            StoreOptions::default(),
        )
        .unwrap();
        assert!(store.is_empty());
        assert_eq!(store.master().next_slot_id, FIRST_DATA_SLOT);
    }

    #[test]
    fn test_handles_share_state() {
        let (mut writer, segment, clock) = store(10_000);
        let mut reader =
            SharedMemoryStore::in_memory(&segment, clock, StoreOptions::default()).unwrap();

        writer.set("k", &entry(20, 60)).unwrap();
        assert_eq!(reader.get("k").unwrap(), Some(entry(20, 60)));

        writer.delete("k").unwrap();
        writer.set("k", &entry(30, 60)).unwrap();
        assert_eq!(
            reader.get("k").unwrap(),
            Some(entry(30, 60)),
            "stale mapping is refreshed"
        );
    }

    #[test]
    fn test_attach_evicts_when_over_high_water() {
        let segment = MemorySegment::new(1000);
        let clock = ManualClock::new(NOW_MS);
        let options = StoreOptions {
            high_water_ratio: 1.0,
            ..StoreOptions::default()
        };
        let mut first = SharedMemoryStore::in_memory(&segment, clock.clone(), options).unwrap();
        first.set("A", &entry(400, 100)).unwrap();
        first.set("B", &entry(400, 10)).unwrap();

        let second =
            SharedMemoryStore::in_memory(&segment, clock, StoreOptions::default()).unwrap();
        assert_eq!(second.len(), 1);
        assert!(second.used_size() <= 500);
    }

    #[test]
    fn test_refused_write_returns_false() {
        let (mut store, _, _) = store(100);
        assert!(!store.set("huge", &entry(200, 60)).unwrap());
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut store, segment, _) = store(10_000);

        store.set("a", &entry(20, 60)).unwrap();
        store.set("b", &entry(20, 60)).unwrap();
        store.reset().unwrap();

        assert!(store.is_empty());
        assert_eq!(store.used_size(), 0);
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(segment.occupied(), MasterRecord::empty().encode().len());
    }

    #[test]
    fn test_increment_creates_and_counts() {
        let (mut store, _, _) = store(10_000);

        assert_eq!(store.increment("gen").unwrap(), 1);
        assert_eq!(store.increment("gen").unwrap(), 2);
        assert_eq!(Backend::counter(&mut store, "gen").unwrap(), Some(2));
    }

    #[test]
    fn test_counter_or_init_only_creates_once() {
        let (mut store, _, _) = store(10_000);

        assert_eq!(store.counter_or_init("gen").unwrap(), 1);
        assert_eq!(store.counter_or_init("gen").unwrap(), 1);
        assert_eq!(store.increment("gen").unwrap(), 2);
        assert_eq!(store.counter_or_init("gen").unwrap(), 2);
    }

    #[test]
    fn test_lock_released_after_operations() {
        let (mut store, segment, _) = store(10_000);

        store.set("k", &entry(20, 60)).unwrap();
        store.evict().unwrap();

        let mut other = ReentrantLock::new(segment.lock());
        assert!(other.acquire().unwrap(), "no operation may leak the lock");
    }

    struct BrokenLock;

    impl RawLock for BrokenLock {
        fn lock(&self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "semaphore removed"))
        }

        fn unlock(&self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lock_failure_is_fatal() {
        let segment = MemorySegment::new(10_000);
        let mut store = SharedMemoryStore::attach(
            segment.arena(),
            BrokenLock,
            ManualClock::new(NOW_MS),
            StoreOptions::default(),
        )
        .unwrap();

        let err = store.set("k", &entry(20, 60)).unwrap_err();
        assert!(matches!(err, CacheError::EngineFatal(_)));
        assert!(err.is_fatal());
    }
}
