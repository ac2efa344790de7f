//! The core module: the data model shared by both quadrature routines.

pub mod errors;
pub mod estimators;

use num_traits::Float;
use rand::RngCore;
use rand_pcg::Pcg64;

pub use errors::QuadratureError;
pub use estimators::{BasicEstimators, BatchEstimators, EstimationResult, Estimators};

/// Trait which every integrand must implement.
///
/// The integrand is invoked concurrently from several worker threads, hence the `Send + Sync`
/// supertraits. It must be a pure function of its sample point: any extra parameters belong into
/// fields of the implementing type and must not be mutated during a call.
pub trait Integrand<T>: Send + Sync {
    /// Calculates the value of the integrand at the sample point `x`, which has `dim()`
    /// coordinates.
    fn call(&self, x: &[T]) -> T;

    /// Returns how many coordinates a sample point has.
    fn dim(&self) -> usize;
}

/// Trait which every sampling distribution for importance sampling must implement.
///
/// Like the integrand, a distribution is invoked concurrently from several workers and must not
/// carry mutable state of its own; all randomness comes from the generator passed in. Parameters
/// of the distribution (a scale, say) belong into fields of the implementing type.
pub trait SampleDistribution<T>: Send + Sync {
    /// Returns the number of coordinates of a single sample.
    fn dim(&self) -> usize;

    /// Draws `n` samples using `rng` and returns them as a row-major buffer of exactly
    /// `n * dim()` values: the first `dim()` values make up the first sample and so on.
    ///
    /// Returning a buffer of any other length is a contract violation that aborts the whole
    /// quadrature call.
    fn sample(&self, rng: &mut dyn RngCore, n: usize) -> Vec<T>;
}

/// An explicit seed pair making a quadrature call reproducible.
///
/// Batch `i` of a seeded run receives the generator `Pcg64::new(state, stream + i)`: all batches
/// share the initial `state` while the stream selector separates them. PCG streams with distinct
/// selectors never coincide, so two batches never replay the same random numbers, and the mapping
/// from `(state, stream, i)` to a generator is injective for any `stream + i < 2^127`. Re-running
/// the identical call with the identical seed and batch partition reproduces every stream bit for
/// bit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Seed {
    /// Initial generator state, shared by all batches.
    pub state: u64,
    /// Base stream selector; batch `i` uses stream `stream + i`.
    pub stream: u64,
}

impl Seed {
    /// Constructor.
    pub const fn new(state: u64, stream: u64) -> Self {
        Self { state, stream }
    }

    /// Returns the private random number generator of batch `batch`.
    pub(crate) fn rng_for_batch(self, batch: usize) -> Pcg64 {
        Pcg64::new(u128::from(self.state), u128::from(self.stream) + batch as u128)
    }
}

/// The axis-aligned integration region of the uniform quadrature routine.
#[derive(Clone, Debug, PartialEq)]
pub struct HyperRectangle<T> {
    xl: Vec<T>,
    xu: Vec<T>,
}

impl<T: Float> HyperRectangle<T> {
    /// Constructs the rectangle with lower bounds `xl` and upper bounds `xu`.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::BoundsMismatch`] if the bound vectors have different lengths
    /// and [`QuadratureError::EmptyRegion`] if they are empty.
    pub fn new(xl: Vec<T>, xu: Vec<T>) -> Result<Self, QuadratureError> {
        if xl.len() != xu.len() {
            return Err(QuadratureError::BoundsMismatch {
                lower: xl.len(),
                upper: xu.len(),
            });
        }
        if xl.is_empty() {
            return Err(QuadratureError::EmptyRegion);
        }

        Ok(Self { xl, xu })
    }

    /// Returns the number of dimensions of the rectangle.
    pub fn dim(&self) -> usize {
        self.xl.len()
    }

    /// Returns the lower bounds.
    pub fn lower(&self) -> &[T] {
        &self.xl
    }

    /// Returns the upper bounds.
    pub fn upper(&self) -> &[T] {
        &self.xu
    }

    /// Returns the volume of the rectangle, the product of its side lengths.
    pub fn volume(&self) -> T {
        self.xl
            .iter()
            .zip(&self.xu)
            .fold(T::one(), |v, (&lo, &hi)| v * (hi - lo))
    }
}

/// How a quadrature call distributes its work: the worker count, the batch size and the seed.
///
/// The defaults are a single worker, one batch per worker and fresh entropy for every batch.
#[derive(Clone, Copy, Debug)]
pub struct RunConfig {
    pub(crate) workers: usize,
    pub(crate) batch_size: Option<usize>,
    pub(crate) seed: Option<Seed>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            batch_size: None,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Constructs the default configuration: serial, unseeded, one batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of worker threads.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the number of points per batch. Without an explicit batch size the requested points
    /// are split evenly across the workers.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Sets the seed, making the run reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the number of worker threads.
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the configured batch size, if one was set explicitly.
    pub const fn batch_size(&self) -> Option<usize> {
        self.batch_size
    }

    /// Returns the seed, if one was set.
    pub const fn seed(&self) -> Option<Seed> {
        self.seed
    }

    /// Checks the point count against this configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error if fewer than two points are requested, the worker pool would
    /// be empty, or an explicit batch size of zero was given.
    pub(crate) fn validate(&self, npoints: usize) -> Result<(), QuadratureError> {
        if npoints < 2 {
            return Err(QuadratureError::NotEnoughPoints(npoints));
        }
        if self.workers < 1 {
            return Err(QuadratureError::NotEnoughWorkers(self.workers));
        }
        if self.batch_size == Some(0) {
            return Err(QuadratureError::EmptyBatches);
        }

        Ok(())
    }
}

/// Splits `npoints` into batch point counts.
///
/// Without an explicit `batch_size` the points are split evenly across the workers, with a
/// minimum of one point per batch. Any remainder is absorbed into the final batch, so the counts
/// always sum to exactly `npoints`.
pub(crate) fn partition_points(
    npoints: usize,
    workers: usize,
    batch_size: Option<usize>,
) -> Vec<usize> {
    let size = batch_size.unwrap_or_else(|| (npoints / workers).max(1));
    let batches = (npoints / size).max(1);

    let mut counts = vec![size; batches];
    // the final batch absorbs the remainder; for npoints < size it shrinks instead
    counts[batches - 1] = npoints - size * (batches - 1);

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn partition_splits_evenly_across_workers() {
        let counts = partition_points(17, 3, None);

        assert_eq!(counts, vec![5, 5, 7]);
        assert_eq!(counts.into_iter().sum::<usize>(), 17);
    }

    #[test]
    fn partition_respects_explicit_batch_size() {
        let counts = partition_points(2000, 2, Some(200));

        assert_eq!(counts.len(), 10);
        assert!(counts.iter().all(|&n| n == 200));
    }

    #[test]
    fn partition_absorbs_remainder_into_final_batch() {
        let counts = partition_points(1003, 1, Some(100));

        assert_eq!(counts.len(), 10);
        assert_eq!(counts[9], 103);
        assert_eq!(counts.into_iter().sum::<usize>(), 1003);
    }

    #[test]
    fn partition_handles_more_workers_than_points() {
        // batch size collapses to one point, leaving one batch per point
        let counts = partition_points(3, 8, None);

        assert_eq!(counts, vec![1, 1, 1]);
    }

    #[test]
    fn partition_handles_oversized_batches() {
        let counts = partition_points(7, 1, Some(100));

        assert_eq!(counts, vec![7]);
    }

    #[test]
    fn partition_total_is_exact_for_awkward_sizes() {
        let total: usize = partition_points(16_490_248, 13, None).into_iter().sum();

        assert_eq!(total, 16_490_248);
    }

    #[test]
    fn batch_streams_are_distinct() {
        let seed = Seed::new(1234, 5678);

        let draws: Vec<u64> = (0..8)
            .map(|batch| seed.rng_for_batch(batch).gen::<u64>())
            .collect();

        for (i, &a) in draws.iter().enumerate() {
            for &b in &draws[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn batch_streams_are_reproducible() {
        let seed = Seed::new(42, 7);

        let mut first = seed.rng_for_batch(3);
        let mut second = seed.rng_for_batch(3);

        for _ in 0..100 {
            assert_eq!(first.gen::<u64>(), second.gen::<u64>());
        }
    }

    #[test]
    fn rectangle_volume() {
        let rect = HyperRectangle::new(vec![-1.0; 6], vec![2.0; 6]).unwrap();

        assert_eq!(rect.dim(), 6);
        assert_eq!(rect.volume(), 3.0_f64.powi(6));
    }

    #[test]
    fn rectangle_rejects_mismatched_bounds() {
        let result = HyperRectangle::new(vec![0.0, 0.0], vec![1.0]);

        assert!(matches!(
            result,
            Err(QuadratureError::BoundsMismatch { lower: 2, upper: 1 })
        ));
    }

    #[test]
    fn rectangle_rejects_empty_bounds() {
        let result = HyperRectangle::<f64>::new(vec![], vec![]);

        assert!(matches!(result, Err(QuadratureError::EmptyRegion)));
    }

    #[test]
    fn config_validation() {
        assert!(RunConfig::new().validate(2).is_ok());
        assert!(matches!(
            RunConfig::new().validate(1),
            Err(QuadratureError::NotEnoughPoints(1))
        ));
        assert!(matches!(
            RunConfig::new().with_workers(0).validate(100),
            Err(QuadratureError::NotEnoughWorkers(0))
        ));
        assert!(matches!(
            RunConfig::new().with_batch_size(0).validate(100),
            Err(QuadratureError::EmptyBatches)
        ));
    }
}
