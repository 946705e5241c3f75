//! Cache Engine Contract
//!
//! The uniform interface every cache front offers. Implementors provide the
//! primitive probe/set/reserve/delete/clear operations; reads with a default,
//! existence checks, `get_set` and the batch helpers are built on top.

use std::collections::HashMap;
use std::time::Duration;

use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};

use super::expiry::Expiry;
use super::stampede::{ProducerError, StampedeGuard};
use crate::error::Result;

/// State of a key as seen by a single read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<V> {
    /// Absent, expired or unreadable
    Miss,
    /// A fill is in progress
    Filling,
    Ready(V),
}

pub trait CacheEngine {
    fn probe<V: DeserializeOwned>(&mut self, key: &str) -> Result<Probe<V>>;

    /// Returns `false` when the substrate refused the write.
    fn set<V: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &V,
        expires: impl Into<Expiry>,
    ) -> Result<bool>;

    /// Writes the fill-in-progress sentinel for `ttl`.
    fn reserve(&mut self, key: &str, ttl: Duration) -> Result<()>;

    fn delete(&mut self, key: &str) -> Result<()>;

    /// Clears the active partition.
    fn clear(&mut self) -> Result<()>;

    fn stampede_guard(&self) -> StampedeGuard {
        StampedeGuard::default()
    }

    // == Provided Operations ==
    /// The stored value, or `default` when missing, expired, unreadable or
    /// still being filled.
    fn get<V: DeserializeOwned>(&mut self, key: &str, default: V) -> Result<V> {
        Ok(match self.probe(key)? {
            Probe::Ready(value) => value,
            Probe::Miss | Probe::Filling => default,
        })
    }

    fn has(&mut self, key: &str) -> Result<bool> {
        Ok(matches!(self.probe::<IgnoredAny>(key)?, Probe::Ready(_)))
    }

    fn get_set<V, F>(&mut self, key: &str, producer: F, expires: impl Into<Expiry>) -> Result<V>
    where
        Self: Sized,
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> std::result::Result<V, ProducerError<V>>,
    {
        let guard = self.stampede_guard();
        guard.fill(self, key, producer, expires.into())
    }

    // == Batch Helpers ==
    // Independent per-key calls: no atomicity across keys.

    fn get_multiple<V, K, I>(&mut self, keys: I, default: V) -> Result<HashMap<String, V>>
    where
        V: DeserializeOwned + Clone,
        K: AsRef<str>,
        I: IntoIterator<Item = K>,
    {
        let mut out = HashMap::new();
        for key in keys {
            let key = key.as_ref();
            out.insert(key.to_string(), self.get(key, default.clone())?);
        }
        Ok(out)
    }

    fn set_multiple<V, K, I>(&mut self, values: I, expires: impl Into<Expiry>) -> Result<HashMap<String, bool>>
    where
        V: Serialize,
        K: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let expires = expires.into();
        let mut out = HashMap::new();
        for (key, value) in values {
            let key = key.as_ref();
            out.insert(key.to_string(), self.set(key, &value, expires)?);
        }
        Ok(out)
    }

    fn delete_multiple<K, I>(&mut self, keys: I) -> Result<()>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.delete(key.as_ref())?;
        }
        Ok(())
    }
}
