//! Shared Arena Engine
//!
//! A bounded key/value store shared by independent processes. The pieces:
//!
//! - [`Arena`] - slot-addressed byte storage ([`FileArena`], [`MemoryArena`])
//! - [`RawLock`] / [`ReentrantLock`] - the process-shared semaphore
//! - [`MasterRecord`] - key map, used size and allocation counter in slot 1
//! - [`SharedMemoryStore`] - allocation, accounting and eviction

mod arena;
mod lock;
mod master;
mod store;

pub use arena::{Arena, FileArena, MemoryArena, MemorySegment};
pub use lock::{FileLock, MemoryLock, RawLock, ReentrantLock};
pub use master::{MasterRecord, FIRST_DATA_SLOT, MASTER_SLOT};
pub use store::{
    EvictionReport, SharedMemoryStore, StoreOptions, DEFAULT_HIGH_WATER_RATIO,
    DEFAULT_RESET_CEILING,
};
