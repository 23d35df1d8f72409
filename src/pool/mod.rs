//! Memory pool management
//!
//! Size-bucketed slabs of pre-sized buffers for allocation-free hot paths.

mod buffer;
mod error;
mod slab;
mod slab_pool;

pub use buffer::{Buffer, SlabTag};
pub use error::{PoolError, PutError};
pub use slab::{Bucket, Slab, SlabStats};
pub use slab_pool::{PoolStats, SlabPool};
