//! Slabpool - Entry Point
//!
//! Runs a concurrent buffer churn workload against a configured pool.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::signal;
use tracing::info;

use slabpool::{workload, Config, SlabPool, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("slabpool.toml"));

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    slabpool::util::init_tracing(&config.logging)?;

    info!(
        version = VERSION,
        config_path = ?config_path,
        "Starting slabpool"
    );

    // The recorder has to exist before the pool resolves its metric handles
    if config.metrics.enabled {
        slabpool::metrics::init_metrics(&config.metrics)?;
    }

    let pool = SlabPool::new(config.pool.name.clone(), &config.pool.buckets);

    let report = {
        let pool = pool.clone();
        let settings = config.workload.clone();
        tokio::task::spawn_blocking(move || workload::run(&pool, &settings))
            .await
            .context("Workload task failed")?
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("{}", serde_json::to_string_pretty(&pool.stats())?);

    if config.metrics.enabled {
        info!(
            bind_addr = %config.metrics.bind_addr,
            "Serving metrics until shutdown"
        );
        shutdown_signal().await?;
        info!("Shutdown signal received");
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?;

        tokio::select! {
            result = signal::ctrl_c() => result.context("Failed to listen for Ctrl+C")?,
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c().await.context("Failed to listen for Ctrl+C")?;

    Ok(())
}
