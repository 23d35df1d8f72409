//! Slabpool - size-bucketed buffer pool
//!
//! This library provides a fixed-capacity memory pool split into slabs of
//! equally sized buffers. Callers borrow zeroed buffers without allocating
//! and return them for reuse; exhaustion is reported immediately instead of
//! blocking.

pub mod config;
pub mod metrics;
pub mod pool;
pub mod util;
pub mod workload;

pub use config::Config;
pub use pool::{Bucket, Buffer, PoolError, PutError, SlabPool};

/// Crate version for display
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
