//! Buffer churn workload
//!
//! Drives borrow/fill/return cycles from several threads against one pool.
//! Request sizes sweep past the largest slab so both failure paths are
//! exercised alongside normal traffic.

use serde::Serialize;
use std::collections::VecDeque;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::WorkloadConfig;
use crate::pool::{Buffer, PoolError, SlabPool};

/// Aggregate workload outcome
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkloadReport {
    pub workers: usize,
    pub requests: u64,
    pub served: u64,
    pub exhausted: u64,
    pub size_exceeded: u64,
    /// Returns the pool refused; non-zero means a routing bug
    pub rejected: u64,
    pub elapsed_ms: u64,
}

impl WorkloadReport {
    fn merge(&mut self, other: &WorkloadReport) {
        self.requests += other.requests;
        self.served += other.served;
        self.exhausted += other.exhausted;
        self.size_exceeded += other.size_exceeded;
        self.rejected += other.rejected;
    }
}

/// Request size for one iteration, up to 25% past the largest slab
fn request_size(worker: usize, iteration: usize, max_size: usize) -> usize {
    let span = max_size + max_size / 4 + 1;
    iteration.wrapping_mul(7919).wrapping_add(worker.wrapping_mul(104_729)) % span
}

fn run_worker(pool: &SlabPool, worker: usize, config: &WorkloadConfig) -> WorkloadReport {
    let mut report = WorkloadReport::default();
    let mut held = VecDeque::with_capacity(config.hold + 1);
    let max_size = pool.max_size();
    let fill = (worker % 255) as u8 + 1;

    let give_back = |buffer: Buffer, report: &mut WorkloadReport| {
        if let Err(e) = pool.put(buffer) {
            warn!(worker, error = %e, "Buffer rejected on return");
            report.rejected += 1;
        }
    };

    for iteration in 0..config.iterations {
        report.requests += 1;
        match pool.get(request_size(worker, iteration, max_size)) {
            Ok(mut buffer) => {
                buffer.fill(fill);
                report.served += 1;
                held.push_back(buffer);
            }
            Err(PoolError::SlabExhausted { .. }) => report.exhausted += 1,
            Err(PoolError::SizeExceeded { .. }) => report.size_exceeded += 1,
        }

        while held.len() > config.hold {
            if let Some(buffer) = held.pop_front() {
                give_back(buffer, &mut report);
            }
        }
    }

    for buffer in held.drain(..) {
        give_back(buffer, &mut report);
    }

    debug!(worker, served = report.served, "Worker finished");
    report
}

/// Run the workload to completion on scoped threads
pub fn run(pool: &SlabPool, config: &WorkloadConfig) -> WorkloadReport {
    let workers = config.effective_workers();
    let started = Instant::now();

    let mut report = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| scope.spawn(move || run_worker(pool, worker, config)))
            .collect();

        let mut total = WorkloadReport::default();
        for handle in handles {
            match handle.join() {
                Ok(partial) => total.merge(&partial),
                Err(_) => warn!("Workload worker panicked"),
            }
        }
        total
    });

    report.workers = workers;
    report.elapsed_ms = started.elapsed().as_millis() as u64;

    info!(
        pool = pool.name(),
        workers,
        requests = report.requests,
        served = report.served,
        exhausted = report.exhausted,
        size_exceeded = report.size_exceeded,
        elapsed_ms = report.elapsed_ms,
        "Workload complete"
    );

    report
}
