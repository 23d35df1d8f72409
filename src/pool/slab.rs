//! Fixed-size buffer slab
//!
//! A slab holds `count` buffers of exactly `size` bytes. The buffers are
//! allocated lazily on the first borrow and then circulate between the
//! lock-free free set and borrowers for the rest of the slab's life.

use crossbeam::queue::ArrayQueue;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::buffer::{Buffer, SlabTag};
use super::error::{PoolError, PutError};
use crate::metrics::{PoolMetrics, SlabMetrics};
use crate::util::humanize_bytes;

/// Configuration of one slab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Buffer size in bytes
    pub size: usize,
    /// Number of buffers
    pub count: usize,
}

impl Bucket {
    pub const fn new(size: usize, count: usize) -> Self {
        Self { size, count }
    }
}

/// A fixed quantity of fixed-size reusable buffers
pub struct Slab {
    size: usize,
    count: usize,
    label: String,
    tag: SlabTag,
    /// Unset until the first borrow
    free: OnceCell<ArrayQueue<Box<[u8]>>>,
    metrics: SlabMetrics,
}

impl Slab {
    /// # Panics
    ///
    /// Panics if the bucket's size or count is zero.
    pub(crate) fn new(tag: SlabTag, bucket: Bucket, metrics: &PoolMetrics) -> Self {
        assert!(bucket.size > 0, "slab buffer size must be greater than zero");
        assert!(bucket.count > 0, "slab buffer count must be greater than zero");

        let label = humanize_bytes(bucket.size as u64);
        let metrics = metrics.slab(&label);

        Self {
            size: bucket.size,
            count: bucket.count,
            label,
            tag,
            free: OnceCell::new(),
            metrics,
        }
    }

    /// Allocate the slab's buffers if that has not happened yet
    ///
    /// Concurrent callers block on the initializer; exactly one of them
    /// performs the allocation.
    pub fn ensure_initialized(&self) {
        self.free_set();
    }

    fn free_set(&self) -> &ArrayQueue<Box<[u8]>> {
        self.free.get_or_init(|| {
            let queue = ArrayQueue::new(self.count);
            for _ in 0..self.count {
                // Cannot overflow: the queue is sized to `count`
                let _ = queue.push(vec![0u8; self.size].into_boxed_slice());
            }
            self.metrics.buffers_added(self.count);
            debug!(slab = %self.label, size = self.size, count = self.count, "Slab initialized");
            queue
        })
    }

    /// Borrow a zeroed buffer with logical length `len`
    ///
    /// Never blocks: an empty free set fails immediately with
    /// [`PoolError::SlabExhausted`].
    pub fn get(&self, len: usize) -> Result<Buffer, PoolError> {
        if len > self.size {
            return Err(PoolError::SizeExceeded {
                requested: len,
                largest: self.size,
            });
        }

        let Some(mut data) = self.free_set().pop() else {
            self.metrics.exhausted();
            debug!(slab = %self.label, requested = len, "Slab exhausted");
            return Err(PoolError::SlabExhausted {
                slab: self.label.clone(),
            });
        };
        self.metrics.buffer_taken();

        // The whole allocation is cleared, not just `len`: the borrower may
        // extend the length up to capacity.
        data.fill(0);

        Ok(Buffer::pooled(data, len, self.tag))
    }

    /// Return a buffer lent by this slab
    ///
    /// The buffer is not cleared here; that happens on its next borrow.
    pub fn put(&self, buffer: Buffer) -> Result<(), PutError> {
        let Some(free) = self.free.get() else {
            warn!(slab = %self.label, "Buffer returned to uninitialized slab");
            return Err(PutError::NotInitialized {
                slab: self.label.clone(),
                buffer,
            });
        };

        if buffer.origin() != Some(self.tag) || buffer.capacity() != self.size {
            warn!(
                slab = %self.label,
                capacity = buffer.capacity(),
                origin = ?buffer.origin(),
                "Buffer returned to a slab that did not lend it"
            );
            return Err(PutError::NotOwned(buffer));
        }

        let len = buffer.len();
        match free.push(buffer.into_storage()) {
            Ok(()) => {
                self.metrics.buffer_returned();
                Ok(())
            }
            Err(data) => {
                warn!(slab = %self.label, "Slab free set overflow on return");
                Err(PutError::SlabFull {
                    slab: self.label.clone(),
                    buffer: Buffer::pooled(data, len, self.tag),
                })
            }
        }
    }

    /// Buffer size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of buffers the slab manages
    pub fn count(&self) -> usize {
        self.count
    }

    /// Human readable size label used in metrics
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tag(&self) -> SlabTag {
        self.tag
    }

    pub fn is_initialized(&self) -> bool {
        self.free.get().is_some()
    }

    /// Buffers currently free (zero before initialization)
    pub fn available(&self) -> usize {
        self.free.get().map_or(0, ArrayQueue::len)
    }

    /// Snapshot of this slab's state
    pub fn stats(&self) -> SlabStats {
        let available = self.available();
        let in_use = if self.is_initialized() {
            self.count - available
        } else {
            0
        };

        SlabStats {
            label: self.label.clone(),
            size: self.size,
            count: self.count,
            initialized: self.is_initialized(),
            available,
            in_use,
            exhausted: self.metrics.exhausted_total(),
        }
    }
}

/// Slab statistics
#[derive(Debug, Clone, Serialize)]
pub struct SlabStats {
    pub label: String,
    pub size: usize,
    pub count: usize,
    pub initialized: bool,
    pub available: usize,
    pub in_use: usize,
    pub exhausted: u64,
}
