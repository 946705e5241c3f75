//! Configuration Module
//!
//! Loads server configuration from environment variables and builds the
//! backend it describes.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use crate::backend::{Backend, Chunked, DynBackend, MemoryBackend, NullBackend};
use crate::cache::{CacheOptions, StampedeGuard, DEFAULT_PARTITION};
use crate::error::{CacheError, Result};
use crate::shm::{SharedMemoryStore, StoreOptions, DEFAULT_HIGH_WATER_RATIO};

/// Default arena size: 16 MiB
pub const DEFAULT_ARENA_CAPACITY: usize = 16 * 1024 * 1024;

// == Backend Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// File-backed shared arena
    Shm,
    /// Process-local map
    Memory,
    /// Stores nothing
    Null,
}

impl FromStr for BackendKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "shm" => Ok(BackendKind::Shm),
            "memory" => Ok(BackendKind::Memory),
            "null" => Ok(BackendKind::Null),
            other => Err(CacheError::InvalidRequest(format!(
                "unknown cache backend '{other}'"
            ))),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    /// Root directory holding file arenas
    pub cache_dir: PathBuf,
    pub arena_id: u32,
    /// Arena size in bytes
    pub arena_capacity: usize,
    pub high_water_ratio: f64,
    pub default_partition: String,
    /// Cache partition generations in-process
    pub namespace_cache: bool,
    /// Entry bound of the memory backend
    pub max_entries: usize,
    /// Split payloads larger than this many bytes; `None` disables chunking
    pub chunk_size: Option<usize>,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `shm`, `memory` or `null` (default: shm)
    /// - `CACHE_DIR` - arena root directory (default: `<tmp>/arena_cache`)
    /// - `ARENA_ID` - arena identifier (default: 1)
    /// - `ARENA_CAPACITY` - arena size in bytes (default: 16 MiB)
    /// - `HIGH_WATER_RATIO` - eviction threshold (default: 0.7)
    /// - `DEFAULT_PARTITION` - partition for unscoped calls (default: "default")
    /// - `NAMESPACE_CACHE` - cache generations in-process (default: false)
    /// - `MAX_ENTRIES` - memory backend bound (default: 1000)
    /// - `CHUNK_SIZE` - chunk oversized payloads (default: off)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - sweep frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: env_or("CACHE_BACKEND", defaults.backend),
            cache_dir: env::var_os("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            arena_id: env_or("ARENA_ID", defaults.arena_id),
            arena_capacity: env_or("ARENA_CAPACITY", defaults.arena_capacity),
            high_water_ratio: env_or("HIGH_WATER_RATIO", defaults.high_water_ratio),
            default_partition: env::var("DEFAULT_PARTITION")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.default_partition),
            namespace_cache: env_or("NAMESPACE_CACHE", defaults.namespace_cache),
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            chunk_size: env::var("CHUNK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size: &usize| *size > 0),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
        }
    }

    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            default_partition: self.default_partition.clone(),
            namespace_cache: self.namespace_cache,
            stampede: StampedeGuard::default(),
        }
    }

    // == Build Backend ==
    /// Opens the configured backend, wrapped in [`Chunked`] when a chunk
    /// size is set.
    pub fn build_backend(&self) -> Result<DynBackend> {
        let backend: DynBackend = match self.backend {
            BackendKind::Shm => {
                let options = StoreOptions {
                    high_water_ratio: self.high_water_ratio,
                    ..StoreOptions::default()
                };
                Box::new(SharedMemoryStore::open(
                    &self.cache_dir,
                    self.arena_id,
                    self.arena_capacity,
                    options,
                )?)
            }
            BackendKind::Memory => Box::new(MemoryBackend::new(self.max_entries)),
            BackendKind::Null => Box::new(NullBackend),
        };

        info!(backend = backend.name(), chunk_size = ?self.chunk_size, "backend ready");
        Ok(match self.chunk_size {
            Some(size) => Box::new(Chunked::new(backend, size)),
            None => backend,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Shm,
            cache_dir: env::temp_dir().join("arena_cache"),
            arena_id: 1,
            arena_capacity: DEFAULT_ARENA_CAPACITY,
            high_water_ratio: DEFAULT_HIGH_WATER_RATIO,
            default_partition: DEFAULT_PARTITION.to_string(),
            namespace_cache: false,
            max_entries: 1000,
            chunk_size: None,
            server_port: 3000,
            sweep_interval: 30,
        }
    }
}
