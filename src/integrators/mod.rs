//! The integration routines and the parallel dispatcher they share.

pub mod importance;
pub mod uniform;

use crate::core::estimators::BatchEstimators;
use crate::core::{partition_points, QuadratureError, RunConfig};

use crossbeam as cb;
use log::{debug, trace};
use num_traits::Float;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

/// One batch worth of sampling and evaluation.
///
/// Implementors run user code; the dispatcher hands every batch its private generator and turns
/// panics raised by the kernel into [`QuadratureError::WorkerFailure`].
pub(crate) trait BatchKernel<T>: Sync {
    fn run(&self, rng: &mut Pcg64, calls: usize) -> Result<BatchEstimators<T>, QuadratureError>;
}

/// Extracts a printable message from a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// Runs `kernel` over all batches assigned to `worker` and folds their statistics.
///
/// Batches are assigned statically: worker `w` owns batches `w`, `w + workers`, and so on. Each
/// batch gets a generator derived from the seed and the batch index, or fresh entropy when no
/// seed was given. On the first failure the shared `failed` flag is raised, so the remaining
/// workers stop picking up new batches.
fn run_worker<T, K>(
    kernel: &K,
    worker: usize,
    config: &RunConfig,
    counts: &[usize],
    failed: &AtomicBool,
) -> Result<BatchEstimators<T>, QuadratureError>
where
    T: Float,
    K: BatchKernel<T>,
{
    let mut acc = BatchEstimators::default();

    for batch in (worker..counts.len()).step_by(config.workers) {
        if failed.load(Ordering::Relaxed) {
            break;
        }

        let calls = counts[batch];
        let mut rng = match config.seed {
            Some(seed) => seed.rng_for_batch(batch),
            None => Pcg64::from_entropy(),
        };

        trace!("worker {} runs batch {} with {} calls", worker, batch, calls);

        let outcome = match catch_unwind(AssertUnwindSafe(|| kernel.run(&mut rng, calls))) {
            Ok(result) => result,
            Err(payload) => Err(QuadratureError::WorkerFailure {
                batch,
                seed: config.seed,
                message: panic_message(payload.as_ref()),
            }),
        };

        match outcome {
            Ok(stats) => acc = acc + stats,
            Err(err) => {
                failed.store(true, Ordering::Relaxed);
                return Err(err);
            }
        }
    }

    Ok(acc)
}

/// Partitions `npoints` into batches, runs them on `config.workers` threads and merges the
/// per-batch statistics.
///
/// Workers share nothing mutable apart from the abort flag. Every worker folds its own batches
/// in increasing index order and the worker results are merged in worker order, so for a fixed
/// partition the merge order, and with a seed the entire result, is reproducible regardless of
/// which batch finishes first.
pub(crate) fn dispatch<T, K>(
    kernel: &K,
    npoints: usize,
    config: &RunConfig,
) -> Result<BatchEstimators<T>, QuadratureError>
where
    T: Float + Send,
    K: BatchKernel<T>,
{
    let counts = partition_points(npoints, config.workers, config.batch_size);

    debug!(
        "dispatching {} points as {} batches across {} workers (seeded: {})",
        npoints,
        counts.len(),
        config.workers,
        config.seed.is_some()
    );

    let failed = AtomicBool::new(false);

    let results = cb::thread::scope(|s| {
        let handles: Vec<_> = (0..config.workers)
            .map(|worker| {
                let counts = &counts;
                let failed = &failed;

                s.spawn(move |_| run_worker(kernel, worker, config, counts, failed))
            })
            .collect();

        // wait for the threads to finish
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    })
    .unwrap();

    let mut merged = BatchEstimators::default();
    for result in results {
        merged = merged + result?;
    }

    Ok(merged)
}
