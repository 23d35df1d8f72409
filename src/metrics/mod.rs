//! Metrics and observability
//!
//! Prometheus-compatible slab availability gauges and error counters.

mod counters;
mod exporter;

pub use counters::*;
pub use exporter::init_metrics;
