//! Worker pool for root-parallel search.
//!
//! The pool scatters independent tasks (one evaluated root move each)
//! across scoped threads and gathers the results synchronously, in task
//! order. Workers share nothing mutable: each task closure copies the
//! board and history it needs, so no locking is involved. There is no
//! cancellation — once dispatched, every task runs to completion.
//!
//! The pool is plain data constructed once and handed to an engine at
//! construction time, so tests can substitute [`WorkerPool::serial`] for
//! deterministic single-threaded execution.

use std::thread;

/// Fraction of available hardware parallelism claimed by default: 3/4.
const PARALLELISM_NUMERATOR: usize = 3;
const PARALLELISM_DENOMINATOR: usize = 4;

/// A fixed-size scatter/gather worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Pool with exactly `workers` workers (clamped to at least 1).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Single-threaded pool: `scatter` runs tasks inline on the caller.
    pub fn serial() -> Self {
        Self::new(1)
    }

    /// Pool sized to 3/4 of available hardware parallelism, minimum 1.
    pub fn from_parallelism() -> Self {
        let available = thread::available_parallelism().map_or(1, |n| n.get());
        Self::new(available * PARALLELISM_NUMERATOR / PARALLELISM_DENOMINATOR)
    }

    /// Number of workers in this pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Whether `scatter` will actually fan out over threads.
    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }

    /// Run `f` over every task and return the results in task order.
    ///
    /// Tasks are split into contiguous chunks, one scoped thread per
    /// chunk; the call blocks until every worker has finished. A panic in
    /// any worker is resumed on the calling thread once the scope joins —
    /// partial results are never returned.
    pub fn scatter<T, R, F>(&self, tasks: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        if self.workers <= 1 || tasks.len() <= 1 {
            return tasks.into_iter().map(f).collect();
        }

        let chunk_len = tasks.len().div_ceil(self.workers);
        let mut chunks: Vec<Vec<T>> = Vec::with_capacity(self.workers);
        let mut rest = tasks.into_iter();
        loop {
            let chunk: Vec<T> = rest.by_ref().take(chunk_len).collect();
            if chunk.is_empty() {
                break;
            }
            chunks.push(chunk);
        }

        let f = &f;
        let mut results = Vec::new();
        thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .into_iter()
                .map(|chunk| scope.spawn(move || chunk.into_iter().map(f).collect::<Vec<R>>()))
                .collect();
            for handle in handles {
                match handle.join() {
                    Ok(chunk_results) => results.extend(chunk_results),
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
        });
        results
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::from_parallelism()
    }
}
