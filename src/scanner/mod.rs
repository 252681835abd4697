//! Scanner module - the concurrent scanning engine.
//!
//! A scan builds a [`WorkQueue`] over the configured port range, runs a
//! [`WorkerPool`] of OS threads that drain it through a [`Prober`], and
//! hands open ports to a [`RecordSink`]. Wall-clock time is measured around
//! the whole pool lifetime.

pub mod pool;
pub mod probe;
pub mod queue;

pub use pool::{PoolStats, WorkerPool};
pub use probe::{probe, ProbeOutcome, Prober, TcpProber};
pub use queue::WorkQueue;

use crate::config::{ScanConfig, ScanMode};
use crate::error::ScanResult;
use crate::output::RecordSink;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

/// Aggregate statistics for a completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub target: String,
    pub start_port: u16,
    pub end_port: u16,
    pub mode: ScanMode,
    pub workers: usize,
    pub timeout_ms: u64,
    pub ports_scanned: usize,
    pub open_ports: usize,
    pub abandoned_ports: usize,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub ports_per_second: f64,
}

impl ScanSummary {
    fn new(
        config: &ScanConfig,
        stats: PoolStats,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        let range = config.range();
        Self {
            target: config.target().to_string(),
            start_port: range.start().as_u16(),
            end_port: range.end().as_u16(),
            mode: config.mode(),
            workers: config.workers(),
            timeout_ms: config.timeout().as_millis() as u64,
            ports_scanned: stats.probed,
            open_ports: stats.open,
            abandoned_ports: stats.abandoned,
            started_at,
            duration_ms: elapsed.as_millis() as u64,
            ports_per_second: ports_per_second(stats.probed, elapsed),
        }
    }

    /// Elapsed wall-clock time in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

fn ports_per_second(ports: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        ports as f64 / secs
    } else {
        ports as f64
    }
}

/// Execute a complete TCP connect scan described by `config`.
pub fn run_scan<S: RecordSink>(config: &ScanConfig, sink: &S) -> ScanResult<ScanSummary> {
    scan_with(config, &TcpProber::new(config), sink)
}

/// Execute a scan with a caller-supplied prober.
pub fn scan_with<P, S>(config: &ScanConfig, prober: &P, sink: &S) -> ScanResult<ScanSummary>
where
    P: Prober,
    S: RecordSink,
{
    let queue = WorkQueue::new(config.range());
    let pool = WorkerPool::new(config.workers());

    info!(
        host = %config.target(),
        ports = %config.range(),
        workers = pool.size(),
        mode = %config.mode(),
        "starting scan"
    );

    let started_at = Utc::now();
    let start = Instant::now();
    let stats = pool.run(&queue, prober, sink)?;
    let elapsed = start.elapsed();

    info!(
        open = stats.open,
        abandoned = stats.abandoned,
        elapsed_ms = elapsed.as_millis() as u64,
        "scan finished"
    );

    Ok(ScanSummary::new(config, stats, started_at, elapsed))
}
