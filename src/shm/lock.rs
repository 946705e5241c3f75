//! Lock Module
//!
//! Process-shared mutual exclusion for the arena. A [`RawLock`] is the bare
//! binary semaphore; [`ReentrantLock`] wraps it so a nested acquire inside the
//! same operation is a no-op and only the outermost caller releases.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use parking_lot::{Condvar, Mutex};

use crate::error::{CacheError, Result};

/// A blocking, non-reentrant binary semaphore shared between handles.
pub trait RawLock: Send {
    /// Blocks until the semaphore is taken. No timeout.
    fn lock(&self) -> io::Result<()>;

    fn unlock(&self) -> io::Result<()>;
}

// == File Lock ==
/// Advisory exclusive lock on a file; shared by every process opening the same path.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RawLock for FileLock {
    fn lock(&self) -> io::Result<()> {
        self.file.lock_exclusive()
    }

    fn unlock(&self) -> io::Result<()> {
        FileExt::unlock(&self.file)
    }
}

// == Memory Lock ==
/// In-process semaphore; clones contend for the same permit.
#[derive(Debug, Clone, Default)]
pub struct MemoryLock {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl MemoryLock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RawLock for MemoryLock {
    fn lock(&self) -> io::Result<()> {
        let (held, released) = &*self.state;
        let mut held = held.lock();
        while *held {
            released.wait(&mut held);
        }
        *held = true;
        Ok(())
    }

    fn unlock(&self) -> io::Result<()> {
        let (held, released) = &*self.state;
        let mut held = held.lock();
        if !*held {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "semaphore released while not held",
            ));
        }
        *held = false;
        released.notify_one();
        Ok(())
    }
}

// == Reentrant Lock ==
/// Tracks whether this handle currently holds the raw lock.
#[derive(Debug)]
pub struct ReentrantLock<L: RawLock> {
    raw: L,
    held: bool,
}

impl<L: RawLock> ReentrantLock<L> {
    pub fn new(raw: L) -> Self {
        Self { raw, held: false }
    }

    /// Takes the lock. Returns `false` when this handle already held it, in
    /// which case the caller must not release.
    pub fn acquire(&mut self) -> Result<bool> {
        if self.held {
            return Ok(false);
        }
        self.raw
            .lock()
            .map_err(|e| CacheError::EngineFatal(format!("unable to acquire lock: {e}")))?;
        self.held = true;
        Ok(true)
    }

    pub fn release(&mut self) -> Result<()> {
        if !self.held {
            return Ok(());
        }
        self.raw
            .unlock()
            .map_err(|e| CacheError::EngineFatal(format!("unable to release lock: {e}")))?;
        self.held = false;
        Ok(())
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl<L: RawLock> Drop for ReentrantLock<L> {
    fn drop(&mut self) {
        if self.held {
            let _ = self.raw.unlock();
        }
    }
}
