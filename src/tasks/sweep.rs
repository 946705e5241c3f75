//! Sweep Task
//!
//! Background task that periodically runs backend housekeeping. Reads already
//! drop expired entries lazily; the sweep reclaims the ones nobody reads.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::cache::Cache;
use crate::clock::Clock;

/// Spawns a task calling [`Cache::sweep`] every `interval_secs` seconds.
///
/// The returned handle is aborted on shutdown. A failed sweep is logged and
/// retried on the next tick.
pub fn spawn_sweep_task<B, C>(cache: Arc<Mutex<Cache<B, C>>>, interval_secs: u64) -> JoinHandle<()>
where
    B: Backend + Send + 'static,
    C: Clock + 'static,
{
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs, "starting sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let cache = Arc::clone(&cache);
            let outcome = tokio::task::spawn_blocking(move || cache.lock().sweep()).await;

            match outcome {
                Ok(Ok(0)) => debug!("sweep: nothing to remove"),
                Ok(Ok(removed)) => info!(removed, "sweep removed entries"),
                Ok(Err(e)) => warn!(error = %e, "sweep failed"),
                Err(e) => warn!(error = %e, "sweep task panicked"),
            }
        }
    })
}
