//! Pool metric handles
//!
//! Handles are resolved against the installed recorder once, when the pool
//! is built, so the hot path only touches the cached handle. Error counts are
//! mirrored in atomics for in-process stats.

use metrics::{counter, gauge, Counter, Gauge};
use std::sync::atomic::{AtomicU64, Ordering};

/// Free buffers per slab
pub const AVAILABLE_BUFFERS: &str = "slabpool_available_buffers_per_slab";
/// Failed borrows by scope and reason
pub const ERRORS_TOTAL: &str = "slabpool_errors_total";

/// Scope label for failures not tied to a single slab
pub const POOL_SCOPE: &str = "pool";

/// Failure reasons reported to the error counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    SizeExceeded,
    SlabExhausted,
}

impl ErrorReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorReason::SizeExceeded => "size-exceeded",
            ErrorReason::SlabExhausted => "slab-exhausted",
        }
    }
}

fn error_counter(pool: &str, scope: &str, reason: ErrorReason) -> Counter {
    counter!(
        ERRORS_TOTAL,
        "pool" => pool.to_owned(),
        "scope" => scope.to_owned(),
        "reason" => reason.as_str()
    )
}

/// Pool-scoped metrics
pub struct PoolMetrics {
    pool: String,
    size_exceeded: Counter,
    size_exceeded_total: AtomicU64,
}

impl PoolMetrics {
    pub fn new(pool: &str) -> Self {
        Self {
            pool: pool.to_owned(),
            size_exceeded: error_counter(pool, POOL_SCOPE, ErrorReason::SizeExceeded),
            size_exceeded_total: AtomicU64::new(0),
        }
    }

    /// Register a slab; its availability gauge starts at zero
    pub fn slab(&self, label: &str) -> SlabMetrics {
        let available = gauge!(
            AVAILABLE_BUFFERS,
            "pool" => self.pool.clone(),
            "slab" => label.to_owned()
        );
        available.increment(0.0);

        SlabMetrics {
            available,
            exhausted: error_counter(&self.pool, label, ErrorReason::SlabExhausted),
            exhausted_total: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn size_exceeded(&self) {
        self.size_exceeded.increment(1);
        self.size_exceeded_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn size_exceeded_total(&self) -> u64 {
        self.size_exceeded_total.load(Ordering::Relaxed)
    }
}

/// Slab-scoped metrics
pub struct SlabMetrics {
    available: Gauge,
    exhausted: Counter,
    exhausted_total: AtomicU64,
}

impl SlabMetrics {
    #[inline]
    pub fn buffers_added(&self, count: usize) {
        self.available.increment(count as f64);
    }

    #[inline]
    pub fn buffer_taken(&self) {
        self.available.decrement(1.0);
    }

    #[inline]
    pub fn buffer_returned(&self) {
        self.available.increment(1.0);
    }

    #[inline]
    pub fn exhausted(&self) {
        self.exhausted.increment(1);
        self.exhausted_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn exhausted_total(&self) -> u64 {
        self.exhausted_total.load(Ordering::Relaxed)
    }
}
