//! Expiry Module
//!
//! Turns the caller-facing expiry argument into an absolute timestamp.

use std::time::Duration;

use chrono::{DateTime, Utc};

// == Expiry ==
/// When a stored value stops being readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    /// Never expires
    #[default]
    Never,
    /// Relative to the moment of the write
    After(Duration),
    /// Absolute calendar time
    At(DateTime<Utc>),
    /// Bare seconds: a duration when smaller than half the current Unix time,
    /// otherwise an absolute Unix timestamp. Zero or negative never expires.
    Raw(i64),
}

impl Expiry {
    pub fn secs(secs: u64) -> Self {
        Expiry::After(Duration::from_secs(secs))
    }

    /// Absolute expiry in Unix milliseconds, 0 = never.
    pub fn resolve(&self, now_ms: u64) -> u64 {
        match *self {
            Expiry::Never => 0,
            Expiry::After(ttl) => now_ms.saturating_add(duration_ms(ttl)).max(1),
            Expiry::At(at) => at.timestamp_millis().max(1) as u64,
            Expiry::Raw(secs) if secs <= 0 => 0,
            Expiry::Raw(secs) => {
                let secs = secs as u64;
                if secs < now_ms / 1000 / 2 {
                    now_ms.saturating_add(secs.saturating_mul(1000))
                } else {
                    secs.saturating_mul(1000)
                }
            }
        }
    }

    /// Remaining lifetime as seen at `now_ms`; `None` means no expiry.
    pub fn ttl(&self, now_ms: u64) -> Option<Duration> {
        match self.resolve(now_ms) {
            0 => None,
            at => Some(Duration::from_millis(at.saturating_sub(now_ms))),
        }
    }
}

/// Whole milliseconds in `ttl`, saturating at `u64::MAX`.
pub(crate) fn duration_ms(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

impl From<Duration> for Expiry {
    fn from(ttl: Duration) -> Self {
        if ttl.is_zero() {
            Expiry::Never
        } else {
            Expiry::After(ttl)
        }
    }
}

impl From<DateTime<Utc>> for Expiry {
    fn from(at: DateTime<Utc>) -> Self {
        Expiry::At(at)
    }
}

impl From<i64> for Expiry {
    fn from(secs: i64) -> Self {
        Expiry::Raw(secs)
    }
}

impl From<Option<Duration>> for Expiry {
    fn from(ttl: Option<Duration>) -> Self {
        ttl.map(Expiry::from).unwrap_or_default()
    }
}
