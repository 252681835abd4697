//! Fixed-size pool of OS worker threads.
//!
//! Workers are scoped threads borrowing the queue, prober, and sink, so none
//! of them can outlive `WorkerPool::run`. All threads are spawned before any
//! of them touches the queue; if spawning fails partway, the workers that
//! already exist are released without probing and joined before returning.

use crate::config::{MAX_WORKERS, MIN_WORKERS};
use crate::error::{ScanError, ScanResult};
use crate::output::RecordSink;
use crate::scanner::probe::Prober;
use crate::scanner::queue::WorkQueue;
use std::sync::{Condvar, Mutex, PoisonError};
use std::thread;
use tracing::{debug, warn};

/// Per-worker counters, summed over the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Ports claimed from the queue.
    pub probed: usize,
    /// Ports found open.
    pub open: usize,
    /// Ports whose probe failed before an outcome was known.
    pub abandoned: usize,
}

impl PoolStats {
    fn merge(&mut self, other: PoolStats) {
        self.probed += other.probed;
        self.open += other.open;
        self.abandoned += other.abandoned;
    }
}

/// Releases all workers at once, or tells them to stand down.
struct StartGate {
    state: Mutex<Option<bool>>,
    opened: Condvar,
}

impl StartGate {
    fn new() -> Self {
        Self {
            state: Mutex::new(None),
            opened: Condvar::new(),
        }
    }

    fn open(&self, proceed: bool) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(proceed);
        self.opened.notify_all();
    }

    /// Block until the gate opens; returns whether work may start.
    fn wait(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self
            .opened
            .wait_while(state, |s| s.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        (*state).unwrap_or(false)
    }
}

/// A pool of symmetric workers draining a shared `WorkQueue`.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Create a pool of `size` workers, clamped to `[MIN_WORKERS, MAX_WORKERS]`.
    pub fn new(size: usize) -> Self {
        Self {
            size: size.clamp(MIN_WORKERS, MAX_WORKERS),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run every worker to completion.
    ///
    /// Each worker loops claiming a port, probing it, and recording open
    /// results until the queue is exhausted. Returns once all workers have
    /// been joined.
    pub fn run<P, S>(&self, queue: &WorkQueue, prober: &P, sink: &S) -> ScanResult<PoolStats>
    where
        P: Prober,
        S: RecordSink,
    {
        let gate = StartGate::new();

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.size);

            for id in 0..self.size {
                let gate = &gate;
                let spawned = thread::Builder::new()
                    .name(format!("worker-{}", id))
                    .spawn_scoped(scope, move || {
                        if gate.wait() {
                            work(id, queue, prober, sink)
                        } else {
                            PoolStats::default()
                        }
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        warn!(worker = id, error = %e, "failed to spawn worker, releasing pool");
                        gate.open(false);
                        for handle in handles {
                            let _ = handle.join();
                        }
                        return Err(ScanError::WorkerSpawn(e));
                    }
                }
            }

            debug!(workers = handles.len(), "all workers spawned");
            gate.open(true);

            let mut total = PoolStats::default();
            let mut panicked = None;
            for (id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(stats) => total.merge(stats),
                    Err(_) => {
                        panicked.get_or_insert(id);
                    }
                }
            }

            match panicked {
                Some(id) => Err(ScanError::WorkerPanicked(id)),
                None => Ok(total),
            }
        })
    }
}

fn work<P, S>(id: usize, queue: &WorkQueue, prober: &P, sink: &S) -> PoolStats
where
    P: Prober,
    S: RecordSink,
{
    let mut stats = PoolStats::default();

    while let Some(port) = queue.next() {
        stats.probed += 1;

        match prober.probe(port) {
            Ok(outcome) if outcome.is_open() => {
                stats.open += 1;
                if let Err(e) = sink.record(&outcome, id) {
                    warn!(worker = id, %port, error = %e, "failed to record result");
                }
            }
            Ok(_) => {}
            Err(e) if e.is_transient() => {
                stats.abandoned += 1;
                debug!(worker = id, %port, error = %e, "probe abandoned");
            }
            Err(e) => {
                stats.abandoned += 1;
                warn!(worker = id, %port, error = %e, "probe failed");
            }
        }
    }

    debug!(worker = id, probed = stats.probed, "worker finished");
    stats
}
