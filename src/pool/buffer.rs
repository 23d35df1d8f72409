//! Pooled byte buffer
//!
//! A buffer owns its full fixed-size allocation and exposes a logical length
//! on top of it. Pooled buffers carry a tag naming the slab that lent them,
//! which is what routes them home on return.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Identifies the slab a pooled buffer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlabTag {
    pool: u64,
    index: usize,
}

impl SlabTag {
    pub(crate) fn new(pool: u64, index: usize) -> Self {
        Self { pool, index }
    }

    /// Id of the owning pool
    pub fn pool_id(&self) -> u64 {
        self.pool
    }

    /// Position of the owning slab within its pool
    pub fn slab_index(&self) -> usize {
        self.index
    }
}

/// A byte buffer borrowed from a slab (or allocated outside the pool)
///
/// The buffer is not `Clone`: returning it moves it back into the pool, so
/// it cannot be returned twice or used after return.
pub struct Buffer {
    data: Box<[u8]>,
    len: usize,
    origin: Option<SlabTag>,
}

impl Buffer {
    pub(crate) fn pooled(data: Box<[u8]>, len: usize, origin: SlabTag) -> Self {
        debug_assert!(len <= data.len());
        Self {
            data,
            len,
            origin: Some(origin),
        }
    }

    /// Allocate a zeroed buffer that does not belong to any pool
    pub fn unpooled(len: usize) -> Self {
        Self {
            data: vec![0u8; len].into_boxed_slice(),
            len,
            origin: None,
        }
    }

    /// Logical length
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Full allocation size, fixed for the buffer's lifetime
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Slab this buffer was lent by, if any
    pub fn origin(&self) -> Option<SlabTag> {
        self.origin
    }

    /// Whether the buffer came from a pool
    pub fn is_pooled(&self) -> bool {
        self.origin.is_some()
    }

    /// Change the logical length within the allocation
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the capacity.
    pub fn set_len(&mut self, len: usize) {
        assert!(
            len <= self.capacity(),
            "length {} exceeds buffer capacity {}",
            len,
            self.capacity()
        );
        self.len = len;
    }

    /// Shorten the logical length, no-op if `len` is not smaller
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    pub(crate) fn into_storage(self) -> Box<[u8]> {
        self.data
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data[..self.len]
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data[..self.len]
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("origin", &self.origin)
            .finish()
    }
}
