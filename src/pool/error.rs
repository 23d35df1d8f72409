//! Pool error types

use thiserror::Error;

use super::buffer::Buffer;

/// Reasons a borrow can fail
///
/// Both variants are backpressure signals: the caller decides whether to
/// reject the request, retry later or fall back to an unpooled allocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No slab is large enough for the requested length
    #[error("no slab found for size: {requested} (largest slab holds {largest} bytes)")]
    SizeExceeded { requested: usize, largest: usize },

    /// The matching slab has no free buffer right now
    #[error("slab exhausted: {slab}")]
    SlabExhausted { slab: String },
}

/// Reasons a returned buffer was not accepted
///
/// Every variant hands the buffer back so the caller keeps ownership of it.
#[derive(Debug, Error)]
pub enum PutError {
    /// The buffer was not lent out by this pool or slab
    #[error("buffer was not allocated by this pool")]
    NotOwned(Buffer),

    /// The slab never lent out a buffer
    #[error("slab {slab} is not initialized")]
    NotInitialized { slab: String, buffer: Buffer },

    /// The free set is already at its bound
    #[error("slab {slab} free set is full")]
    SlabFull { slab: String, buffer: Buffer },
}

impl PutError {
    /// Take back the rejected buffer
    pub fn into_buffer(self) -> Buffer {
        match self {
            PutError::NotOwned(buffer)
            | PutError::NotInitialized { buffer, .. }
            | PutError::SlabFull { buffer, .. } => buffer,
        }
    }
}
