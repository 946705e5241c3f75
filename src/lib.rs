//! Arena Cache - a pluggable cache layer
//!
//! A typed cache front with partition invalidation and stampede protection,
//! over interchangeable backends including a bounded arena shared by
//! independent processes.

pub mod api;
pub mod backend;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod shm;
pub mod tasks;

pub use api::AppState;
pub use backend::{Backend, DynBackend};
pub use cache::{Cache, CacheEngine, Expiry, ProducerError};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
