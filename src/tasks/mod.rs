//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Sweep: backend housekeeping (expired entry removal, arena eviction)

mod sweep;

pub use sweep::spawn_sweep_task;
