//! Size-bucketed slab pool
//!
//! Routes borrows to the smallest slab that fits and returns to the slab
//! that lent the buffer.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::buffer::{Buffer, SlabTag};
use super::error::{PoolError, PutError};
use super::slab::{Bucket, Slab, SlabStats};
use crate::metrics::PoolMetrics;

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

struct SlabPoolInner {
    id: u64,
    name: String,
    /// Ascending by buffer size
    slabs: Box<[Slab]>,
    metrics: PoolMetrics,
}

/// A set of slabs sorted by buffer size
///
/// Cloning is cheap and clones share the same slabs.
#[derive(Clone)]
pub struct SlabPool {
    inner: Arc<SlabPoolInner>,
}

impl SlabPool {
    /// Build one slab per bucket
    ///
    /// Buckets must be sorted by strictly ascending size; they are not
    /// re-sorted. No buffer memory is allocated until a slab is first used.
    ///
    /// # Panics
    ///
    /// Panics if any bucket has a zero size or count.
    pub fn new(name: impl Into<String>, buckets: &[Bucket]) -> Self {
        let name = name.into();
        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        let metrics = PoolMetrics::new(&name);

        let slabs: Vec<Slab> = buckets
            .iter()
            .enumerate()
            .map(|(index, bucket)| Slab::new(SlabTag::new(id, index), *bucket, &metrics))
            .collect();

        info!(
            pool = %name,
            slabs = slabs.len(),
            max_size = slabs.last().map_or(0, Slab::size),
            "Slab pool created"
        );

        Self {
            inner: Arc::new(SlabPoolInner {
                id,
                name,
                slabs: slabs.into_boxed_slice(),
                metrics,
            }),
        }
    }

    /// Borrow a zeroed buffer of length `size`
    ///
    /// The capacity is the size of the first slab that fits. Requests larger
    /// than every slab fail with [`PoolError::SizeExceeded`] without touching
    /// any slab.
    pub fn get(&self, size: usize) -> Result<Buffer, PoolError> {
        match self.inner.slabs.iter().find(|slab| slab.size() >= size) {
            Some(slab) => slab.get(size),
            None => {
                self.inner.metrics.size_exceeded();
                debug!(pool = %self.inner.name, requested = size, "No slab large enough");
                Err(PoolError::SizeExceeded {
                    requested: size,
                    largest: self.max_size(),
                })
            }
        }
    }

    /// Borrow a buffer, allocating an unpooled one if the pool cannot serve
    ///
    /// An unpooled buffer is rejected by [`SlabPool::put`] and simply freed
    /// when dropped.
    pub fn get_or_alloc(&self, size: usize) -> Buffer {
        self.get(size).unwrap_or_else(|_| Buffer::unpooled(size))
    }

    /// Return a buffer to the slab that lent it
    ///
    /// `Ok` means the buffer was accepted. Buffers from other pools, and
    /// unpooled buffers, are handed back inside the error.
    pub fn put(&self, buffer: Buffer) -> Result<(), PutError> {
        let slab = buffer
            .origin()
            .filter(|tag| tag.pool_id() == self.inner.id)
            .and_then(|tag| self.inner.slabs.get(tag.slab_index()));

        match slab {
            Some(slab) => slab.put(buffer),
            None => {
                debug!(
                    pool = %self.inner.name,
                    capacity = buffer.capacity(),
                    "Buffer not owned by pool"
                );
                Err(PutError::NotOwned(buffer))
            }
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn slabs(&self) -> &[Slab] {
        &self.inner.slabs
    }

    /// Largest request the pool can serve
    pub fn max_size(&self) -> usize {
        self.inner.slabs.last().map_or(0, Slab::size)
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            name: self.inner.name.clone(),
            slabs: self.inner.slabs.iter().map(Slab::stats).collect(),
            size_exceeded: self.inner.metrics.size_exceeded_total(),
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    pub name: String,
    pub slabs: Vec<SlabStats>,
    pub size_exceeded: u64,
}

impl PoolStats {
    pub fn available(&self) -> usize {
        self.slabs.iter().map(|s| s.available).sum()
    }

    pub fn in_use(&self) -> usize {
        self.slabs.iter().map(|s| s.in_use).sum()
    }

    pub fn exhausted(&self) -> u64 {
        self.slabs.iter().map(|s| s.exhausted).sum()
    }
}
