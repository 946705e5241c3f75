//! Arena Module
//!
//! A fixed-capacity byte store addressed by small integer slot ids. Slot
//! writes replace the whole payload atomically so unguarded readers see either
//! the old bytes, the new bytes, or nothing.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::info;

use super::lock::{FileLock, MemoryLock};
use crate::error::{CacheError, Result};

/// Slot storage shared between handles.
pub trait Arena: Send {
    /// Capacity in bytes.
    fn capacity(&self) -> usize;

    fn read(&self, slot: u32) -> Result<Option<Vec<u8>>>;

    /// Replaces a slot's payload. Returns `false` when it does not fit.
    fn write(&mut self, slot: u32, bytes: &[u8]) -> Result<bool>;

    /// Returns whether the slot existed.
    fn remove(&mut self, slot: u32) -> Result<bool>;

    fn slot_len(&self, slot: u32) -> Result<Option<usize>> {
        Ok(self.read(slot)?.map(|bytes| bytes.len()))
    }

    fn contains(&self, slot: u32) -> Result<bool> {
        Ok(self.slot_len(slot)?.is_some())
    }
}

// == Memory Segment ==
/// An in-process stand-in for a shared memory segment and its semaphore.
/// Every [`MemoryArena`] and [`MemoryLock`] handed out refers to the same state.
#[derive(Debug, Clone)]
pub struct MemorySegment {
    slots: Arc<Mutex<HashMap<u32, Vec<u8>>>>,
    lock: MemoryLock,
    capacity: usize,
}

impl MemorySegment {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            lock: MemoryLock::new(),
            capacity,
        }
    }

    pub fn arena(&self) -> MemoryArena {
        MemoryArena {
            slots: self.slots.clone(),
            capacity: self.capacity,
        }
    }

    pub fn lock(&self) -> MemoryLock {
        self.lock.clone()
    }

    /// Bytes held across all slots, master record included.
    pub fn occupied(&self) -> usize {
        self.slots.lock().values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone)]
pub struct MemoryArena {
    slots: Arc<Mutex<HashMap<u32, Vec<u8>>>>,
    capacity: usize,
}

impl Arena for MemoryArena {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn read(&self, slot: u32) -> Result<Option<Vec<u8>>> {
        Ok(self.slots.lock().get(&slot).cloned())
    }

    fn write(&mut self, slot: u32, bytes: &[u8]) -> Result<bool> {
        let mut slots = self.slots.lock();
        let occupied: usize = slots.values().map(Vec::len).sum();
        let previous = slots.get(&slot).map_or(0, Vec::len);
        if occupied - previous + bytes.len() > self.capacity {
            return Ok(false);
        }
        slots.insert(slot, bytes.to_vec());
        Ok(true)
    }

    fn remove(&mut self, slot: u32) -> Result<bool> {
        Ok(self.slots.lock().remove(&slot).is_some())
    }

    fn slot_len(&self, slot: u32) -> Result<Option<usize>> {
        Ok(self.slots.lock().get(&slot).map(Vec::len))
    }
}

// == File Arena ==
/// Directory-backed arena: one file per slot under `<root>/arena-<id>/`,
/// replaced through write-to-temp and rename. Any process attaching the same
/// root and id shares the slots.
///
/// Capacity is not re-checked on disk; the store's size accounting and
/// high-water mark keep the directory within bounds.
#[derive(Debug)]
pub struct FileArena {
    dir: PathBuf,
    capacity: usize,
}

impl FileArena {
    pub fn attach(root: impl AsRef<Path>, id: u32, capacity: usize) -> Result<Self> {
        let dir = root.as_ref().join(format!("arena-{id}"));
        fs::create_dir_all(&dir).map_err(|e| {
            CacheError::Connection(format!("cannot attach arena at {}: {e}", dir.display()))
        })?;
        info!(path = %dir.display(), capacity, "attached file arena");
        Ok(Self { dir, capacity })
    }

    /// Opens the semaphore guarding this arena.
    pub fn lock(&self) -> Result<FileLock> {
        FileLock::open(self.dir.join("arena.lock")).map_err(|e| {
            CacheError::Connection(format!(
                "cannot open arena lock in {}: {e}",
                self.dir.display()
            ))
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: u32) -> PathBuf {
        self.dir.join(format!("slot-{slot}.bin"))
    }
}

impl Arena for FileArena {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn read(&self, slot: u32) -> Result<Option<Vec<u8>>> {
        match fs::read(self.slot_path(slot)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, slot: u32, bytes: &[u8]) -> Result<bool> {
        if bytes.len() > self.capacity {
            return Ok(false);
        }
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(bytes)?;
        temp.persist(self.slot_path(slot)).map_err(|e| e.error)?;
        Ok(true)
    }

    fn remove(&mut self, slot: u32) -> Result<bool> {
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn slot_len(&self, slot: u32) -> Result<Option<usize>> {
        match fs::metadata(self.slot_path(slot)) {
            Ok(meta) => Ok(Some(meta.len() as usize)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
