//! Column-parallel execution.

use std::num::NonZeroUsize;
use std::thread;

use rayon::prelude::*;
use tracing::warn;

/// Number of workers for a stage over `columns` independent columns.
pub(crate) fn worker_count(columns: usize) -> usize {
    let available = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    columns.min(available).max(1)
}

/// Run `f` once per column index on a pool of `min(columns, cores)` workers.
///
/// Results come back in column order. Falls back to sequential execution if
/// the pool cannot be built.
pub(crate) fn map_columns<T, F>(columns: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    let workers = worker_count(columns);
    if workers <= 1 {
        return (0..columns).map(f).collect();
    }

    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(|| (0..columns).into_par_iter().map(&f).collect()),
        Err(e) => {
            warn!(error = %e, "worker pool unavailable, running sequentially");
            (0..columns).map(f).collect()
        }
    }
}
