//! Chunking Adapter
//!
//! Some substrates cap the size of a single item (Memcached's historic 1 MB).
//! [`Chunked`] splits every payload into fixed-size pieces stored under
//! `key_0 .. key_{n-1}` and records the chunk count under `key_meta`.
//! Every piece is itself wrapped in an entry envelope so envelope-aware
//! substrates (the shared arena's eviction pass) can still read its expiry.

use serde::{Deserialize, Serialize};

use super::Backend;
use crate::cache::{CacheEntry, EntryKind};
use crate::error::Result;

/// Default maximum payload stored under a single sub-key
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

#[derive(Debug, Serialize, Deserialize)]
struct ChunkMeta {
    chunks: usize,
    len: usize,
}

#[derive(Debug)]
pub struct Chunked<B> {
    inner: B,
    chunk_size: usize,
}

impl<B: Backend> Chunked<B> {
    pub fn new(inner: B, chunk_size: usize) -> Self {
        Self {
            inner,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    fn meta_key(key: &str) -> String {
        format!("{key}_meta")
    }

    fn chunk_key(key: &str, index: usize) -> String {
        format!("{key}_{index}")
    }

    fn read_meta(&mut self, key: &str) -> Result<Option<ChunkMeta>> {
        let Some(bytes) = self.inner.fetch(&Self::meta_key(key))? else {
            return Ok(None);
        };
        let meta = CacheEntry::decode(&bytes)
            .ok()
            .filter(|entry| entry.kind == EntryKind::Value)
            .and_then(|entry| serde_json::from_slice(&entry.data).ok());
        Ok(meta)
    }
}

impl<B: Backend> Backend for Chunked<B> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn fetch(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(meta) = self.read_meta(key)? else {
            return Ok(None);
        };

        let mut out = Vec::with_capacity(meta.len);
        for index in 0..meta.chunks {
            let Some(bytes) = self.inner.fetch(&Self::chunk_key(key, index))? else {
                return Ok(None);
            };
            match CacheEntry::decode(&bytes) {
                Ok(piece) => out.extend_from_slice(&piece.data),
                Err(_) => return Ok(None),
            }
        }

        if out.len() != meta.len {
            return Ok(None);
        }
        Ok(Some(out))
    }

    fn store(&mut self, key: &str, bytes: Vec<u8>, expires_at: u64) -> Result<bool> {
        let previous = self.read_meta(key)?.map_or(0, |meta| meta.chunks);
        let pieces: Vec<&[u8]> = if bytes.is_empty() {
            vec![&bytes[..]]
        } else {
            bytes.chunks(self.chunk_size).collect()
        };

        for (index, piece) in pieces.iter().enumerate() {
            let wrapped = CacheEntry::value(piece.to_vec(), expires_at).encode();
            if !self.inner.store(&Self::chunk_key(key, index), wrapped, expires_at)? {
                return Ok(false);
            }
        }

        let meta = ChunkMeta {
            chunks: pieces.len(),
            len: bytes.len(),
        };
        let meta = CacheEntry::value(serde_json::to_vec(&meta)?, expires_at).encode();
        let stored = self.inner.store(&Self::meta_key(key), meta, expires_at)?;

        // a shorter payload leaves the tail of the old one behind
        for index in pieces.len()..previous {
            self.inner.remove(&Self::chunk_key(key, index))?;
        }
        Ok(stored)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let meta = self.read_meta(key)?;
        self.inner.remove(&Self::meta_key(key))?;
        if let Some(meta) = meta {
            for index in 0..meta.chunks {
                self.inner.remove(&Self::chunk_key(key, index))?;
            }
        }
        Ok(())
    }

    fn counter(&mut self, key: &str) -> Result<Option<u64>> {
        self.inner.counter(key)
    }

    fn increment(&mut self, key: &str) -> Result<u64> {
        self.inner.increment(key)
    }

    fn counter_or_init(&mut self, key: &str) -> Result<u64> {
        self.inner.counter_or_init(key)
    }

    fn sweep(&mut self) -> Result<usize> {
        self.inner.sweep()
    }
}
