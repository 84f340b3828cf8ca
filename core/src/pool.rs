//! # Worker Pool
//!
//! Check tasks run on a bounded pool. The round controller never waits on
//! individual tasks; it polls the pool counters until nothing is queued or
//! running.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::trace;

use crate::check::CheckTask;

pub trait WorkerPool: Send + Sync {
    /// Hands `task` to the pool. Never blocks the caller.
    fn submit(&self, task: CheckTask);

    /// Tasks currently executing.
    fn active_count(&self) -> usize;

    /// Tasks accepted but not yet started.
    fn queue_len(&self) -> usize;

    /// Tasks finished since the pool was created.
    fn completed_count(&self) -> u64;
}

#[derive(Debug, Default)]
struct PoolStats {
    queued: AtomicUsize,
    active: AtomicUsize,
    completed: AtomicU64,
}

/// Runs at most `workers` tasks at once on the current tokio runtime; the rest
/// wait for a permit in submission order.
#[derive(Debug, Clone)]
pub struct BoundedPool {
    permits: Arc<Semaphore>,
    stats: Arc<PoolStats>,
    workers: usize,
}

impl BoundedPool {
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            permits: Arc::new(Semaphore::new(workers)),
            stats: Arc::new(PoolStats::default()),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// Keeps `active`/`completed` honest even if a task panics.
struct Running(Arc<PoolStats>);

impl Drop for Running {
    fn drop(&mut self) {
        self.0.completed.fetch_add(1, Ordering::SeqCst);
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl WorkerPool for BoundedPool {
    /// Must be called from within a tokio runtime.
    fn submit(&self, task: CheckTask) {
        let permits = Arc::clone(&self.permits);
        let stats = Arc::clone(&self.stats);
        stats.queued.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                stats.queued.fetch_sub(1, Ordering::SeqCst);
                return;
            };

            // Count as active before leaving the queue so the pool never looks idle in between.
            stats.active.fetch_add(1, Ordering::SeqCst);
            stats.queued.fetch_sub(1, Ordering::SeqCst);
            let _running = Running(Arc::clone(&stats));

            trace!(host = %task.host(), "Running check task");
            task.run().await;
        });
    }

    fn active_count(&self) -> usize {
        self.stats.active.load(Ordering::SeqCst)
    }

    fn queue_len(&self) -> usize {
        self.stats.queued.load(Ordering::SeqCst)
    }

    fn completed_count(&self) -> u64 {
        self.stats.completed.load(Ordering::SeqCst)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
