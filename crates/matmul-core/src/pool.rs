//! Bounded worker pool for the parallel variants.
//!
//! Every fork-join fan-out runs inside a `WorkerPool`, so row-parallel
//! naive multiplication schedules rows onto a fixed number of threads
//! instead of spawning one thread per row.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

use crate::error::MatmulError;

/// Rayon pool the parallel variants run inside.
#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    dedicated: Option<Arc<ThreadPool>>,
}

impl WorkerPool {
    /// Use rayon's global pool.
    #[must_use]
    pub fn global() -> Self {
        Self { dedicated: None }
    }

    /// Build a pool with at most `max_threads` workers (0 = global pool).
    ///
    /// Requests above `2 * available_parallelism` are clamped.
    pub fn new(max_threads: usize) -> Result<Self, MatmulError> {
        if max_threads == 0 {
            return Ok(Self::global());
        }
        let threads = capped_threads(Some(max_threads));
        if threads < max_threads {
            warn!(requested = max_threads, threads, "clamping worker pool size");
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("matmul-worker-{i}"))
            .build()
            .map_err(|e| MatmulError::Pool(format!("failed to create thread pool: {e}")))?;
        Ok(Self {
            dedicated: Some(Arc::new(pool)),
        })
    }

    /// Run `op` inside the pool; rayon calls made by `op` use its workers.
    pub fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.dedicated {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Number of worker threads tasks are scheduled onto.
    #[must_use]
    pub fn num_threads(&self) -> usize {
        match &self.dedicated {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

/// Get the default parallelism level (2 * `num_cpus`).
#[must_use]
pub fn default_parallelism() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(4);
    cpus * 2
}

/// Worker count for a dedicated rayon pool: the request, capped at
/// [`default_parallelism`]. `None` or zero yields the cap itself.
#[must_use]
pub fn capped_threads(requested: Option<usize>) -> usize {
    let max = default_parallelism();
    match requested {
        Some(n) if n > 0 => n.min(max),
        _ => max,
    }
}
