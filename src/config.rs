//! Configuration management
//!
//! Handles loading and validating pool configuration from TOML files.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

use crate::pool::Bucket;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub pool: PoolConfig,
    #[serde(default)]
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Slab pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Pool name, used as a metric label
    #[serde(default = "default_pool_name")]
    pub name: String,
    /// Slab buckets, ascending by size
    #[serde(default = "default_buckets")]
    pub buckets: Vec<Bucket>,
}

/// Churn workload configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadConfig {
    /// Number of worker threads (0 = auto)
    #[serde(default)]
    pub workers: usize,
    /// Borrows per worker
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Buffers each worker keeps outstanding before returning the oldest
    #[serde(default = "default_hold")]
    pub hold: usize,
}

impl WorkloadConfig {
    /// Get effective worker count (auto-detect if 0)
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            iterations: default_iterations(),
            hold: default_hold(),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable metrics endpoint
    #[serde(default)]
    pub enabled: bool,
    /// Metrics server bind address
    #[serde(default = "default_metrics_addr")]
    pub bind_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_addr: default_metrics_addr(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_pool_name() -> String { "default".to_string() }
fn default_buckets() -> Vec<Bucket> { Config::default_buckets() }
fn default_iterations() -> usize { 100_000 }
fn default_hold() -> usize { 4 }
fn default_metrics_addr() -> SocketAddr { SocketAddr::from(([127, 0, 0, 1], 9090)) }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .with_context(|| "Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Bucket ladder used when the file does not list any
    pub fn default_buckets() -> Vec<Bucket> {
        vec![
            Bucket::new(4 << 10, 1024),
            Bucket::new(16 << 10, 512),
            Bucket::new(64 << 10, 128),
            Bucket::new(256 << 10, 32),
        ]
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let buckets = &self.pool.buckets;
        if buckets.is_empty() {
            anyhow::bail!("pool.buckets must not be empty");
        }
        for bucket in buckets {
            if bucket.size == 0 {
                anyhow::bail!("bucket size must be > 0");
            }
            if bucket.count == 0 {
                anyhow::bail!("bucket count must be > 0 (size {})", bucket.size);
            }
        }
        for pair in buckets.windows(2) {
            if pair[0].size >= pair[1].size {
                anyhow::bail!(
                    "bucket sizes must be strictly ascending ({} then {})",
                    pair[0].size,
                    pair[1].size
                );
            }
        }
        if self.workload.iterations == 0 {
            anyhow::bail!("workload.iterations must be > 0");
        }
        Ok(())
    }
}
