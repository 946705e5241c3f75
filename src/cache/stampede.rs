//! Stampede Guard
//!
//! The `get_set` fill protocol. A caller that finds a key missing writes a
//! short-lived sentinel before running the producer, so concurrent callers
//! wait for its result instead of recomputing it.
//!
//! ```text
//! MISS ──reserve──> FILLING ──set──> READY
//!   ^                  │
//!   └──delete (error, uncacheable, refused write)
//! ```
//!
//! Two callers can still both observe MISS before either writes the
//! sentinel; the producer then runs more than once and the last write wins.

use std::thread;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::engine::{CacheEngine, Probe};
use super::expiry::Expiry;
use crate::error::{CacheError, Result};

/// Delay between re-reads of a key that is being filled
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Re-reads before a waiting caller takes over the fill
pub const DEFAULT_MAX_POLLS: u32 = 50;

/// Lifetime of the sentinel; bounds the stall left by a crashed filler
pub const DEFAULT_SENTINEL_TTL: Duration = Duration::from_secs(10);

// == Producer Error ==
/// How a `get_set` producer can fail.
#[derive(Debug)]
pub enum ProducerError<V> {
    /// The value is usable but must not be cached
    Uncacheable(V),
    /// Hard failure, surfaced to the caller as [`CacheError::Producer`]
    Failed(anyhow::Error),
}

impl<V> From<anyhow::Error> for ProducerError<V> {
    fn from(err: anyhow::Error) -> Self {
        ProducerError::Failed(err)
    }
}

// == Stampede Guard ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampedeGuard {
    pub poll_interval: Duration,
    pub max_polls: u32,
    pub sentinel_ttl: Duration,
}

impl Default for StampedeGuard {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
            sentinel_ttl: DEFAULT_SENTINEL_TTL,
        }
    }
}

impl StampedeGuard {
    /// Worst-case time spent waiting on another caller's fill.
    pub fn max_wait(&self) -> Duration {
        self.poll_interval * self.max_polls
    }

    // == Fill ==
    /// Returns the cached value for `key`, running `producer` and caching
    /// its result when the key is missing.
    pub fn fill<E, V, F>(&self, engine: &mut E, key: &str, producer: F, expires: Expiry) -> Result<V>
    where
        E: CacheEngine,
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> std::result::Result<V, ProducerError<V>>,
    {
        let mut polls = 0;
        loop {
            match engine.probe::<V>(key)? {
                Probe::Ready(value) => return Ok(value),
                Probe::Miss => break,
                Probe::Filling if polls >= self.max_polls => {
                    warn!(key, polls, "fill still in progress, taking over");
                    break;
                }
                Probe::Filling => {
                    polls += 1;
                    thread::sleep(self.poll_interval);
                }
            }
        }

        engine.reserve(key, self.sentinel_ttl)?;
        debug!(key, "filling");

        match producer() {
            Ok(value) => {
                if !engine.set(key, &value, expires)? {
                    // the sentinel would otherwise stall waiters until its TTL
                    engine.delete(key)?;
                }
                Ok(value)
            }
            Err(ProducerError::Uncacheable(value)) => {
                debug!(key, "producer result marked uncacheable");
                engine.delete(key)?;
                Ok(value)
            }
            Err(ProducerError::Failed(err)) => {
                if let Err(cleanup) = engine.delete(key) {
                    warn!(key, error = %cleanup, "could not remove fill sentinel");
                }
                Err(CacheError::Producer(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let guard = StampedeGuard::default();
        assert_eq!(guard.poll_interval, Duration::from_millis(200));
        assert_eq!(guard.max_polls, 50);
        assert_eq!(guard.sentinel_ttl, Duration::from_secs(10));
        assert_eq!(guard.max_wait(), Duration::from_secs(10));
    }

    #[test]
    fn test_anyhow_converts_to_failed() {
        let err: ProducerError<u32> = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ProducerError::Failed(e) if e.to_string() == "boom"));
    }
}
