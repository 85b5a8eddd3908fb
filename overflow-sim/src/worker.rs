//! Dedicated rayon pool for independent trials.
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::constants::{TRIAL_CHUNK, WORKER_STACK_BYTES};
use crate::error::SimError;

/// Thread pool that fans trials out and gathers results in trial order.
#[derive(Clone)]
pub struct TrialPool {
    pool: Arc<ThreadPool>,
    threads: usize,
}

impl TrialPool {
    /// Build a pool with `requested` threads; `0` leaves one core free.
    ///
    /// # Errors
    ///
    /// Returns `SimError::WorkerPool` if rayon cannot spawn the threads.
    pub fn new(requested: usize) -> Result<Self, SimError> {
        let threads = if requested == 0 {
            auto_thread_count()
        } else {
            requested
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("overflow-trial-{i}"))
            .stack_size(WORKER_STACK_BYTES)
            .build()?;
        debug!("trial pool ready with {threads} threads");
        Ok(Self {
            pool: Arc::new(pool),
            threads,
        })
    }

    #[must_use]
    pub const fn thread_count(&self) -> usize {
        self.threads
    }

    /// Run `trial(i)` for every `i in 0..trials`; the output is indexed by `i`
    /// no matter how the work was scheduled.
    ///
    /// # Errors
    ///
    /// Returns the first trial error in index order, or `SimError::WorkerPool`
    /// if a trial panicked.
    pub fn run_trials<T, F>(&self, trials: usize, trial: F) -> Result<Vec<T>, SimError>
    where
        T: Send,
        F: Fn(u64) -> Result<T, SimError> + Sync + Send,
    {
        let outcome = self.pool.install(|| {
            panic::catch_unwind(AssertUnwindSafe(|| {
                (0..trials)
                    .into_par_iter()
                    .with_min_len(TRIAL_CHUNK)
                    .map(|i| trial(u64::try_from(i).unwrap_or(u64::MAX)))
                    .collect::<Result<Vec<T>, SimError>>()
            }))
        });
        match outcome {
            Ok(results) => results,
            Err(err) => Err(SimError::WorkerPool(panic_message(err.as_ref()))),
        }
    }
}

impl std::fmt::Debug for TrialPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrialPool")
            .field("threads", &self.threads)
            .finish_non_exhaustive()
    }
}

fn auto_thread_count() -> usize {
    let cores = std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get);
    if cores > 2 { cores - 1 } else { cores }
}

fn panic_message(err: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<&str>() {
        format!("trial panicked: {s}")
    } else if let Some(s) = err.downcast_ref::<String>() {
        format!("trial panicked: {s}")
    } else {
        "trial panicked".to_string()
    }
}
