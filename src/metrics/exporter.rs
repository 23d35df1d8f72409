//! Prometheus metrics exporter
//!
//! HTTP endpoint for Prometheus scraping.

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

use super::counters::{AVAILABLE_BUFFERS, ERRORS_TOTAL};
use crate::config::MetricsConfig;

/// Install the Prometheus recorder and its HTTP listener
///
/// Must run inside a Tokio runtime and before any pool is built, since pools
/// resolve their metric handles at construction.
pub fn init_metrics(config: &MetricsConfig) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(config.bind_addr)
        .install()
        .with_context(|| format!("Failed to install Prometheus exporter on {}", config.bind_addr))?;

    describe_gauge!(AVAILABLE_BUFFERS, "Buffers currently free in each slab");
    describe_counter!(ERRORS_TOTAL, "Failed buffer borrows by scope and reason");

    info!(bind_addr = %config.bind_addr, "Prometheus exporter installed");
    Ok(())
}
