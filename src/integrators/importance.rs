//! Importance-sampling quadrature with a user-supplied distribution.

use crate::core::estimators::{BasicEstimators, BatchEstimators, EstimationResult, Estimators};
use crate::core::{Integrand, QuadratureError, RunConfig, SampleDistribution};
use crate::integrators::{dispatch, BatchKernel};

use num_traits::{Float, FromPrimitive};
use rand_pcg::Pcg64;

/// Draws a batch of samples from the user distribution and evaluates the weighted integrand.
struct ImportanceKernel<'a, T, I, D> {
    integrand: &'a I,
    distribution: &'a D,
    weight: T,
}

impl<'a, T, I, D> BatchKernel<T> for ImportanceKernel<'a, T, I, D>
where
    T: Float + Send + Sync,
    I: Integrand<T>,
    D: SampleDistribution<T>,
{
    fn run(&self, rng: &mut Pcg64, calls: usize) -> Result<BatchEstimators<T>, QuadratureError> {
        let dim = self.distribution.dim();

        // the distribution is invoked exactly once per batch
        let samples = self.distribution.sample(rng, calls);

        if samples.len() != calls * dim {
            return Err(QuadratureError::SampleCountMismatch {
                expected: calls * dim,
                actual: samples.len(),
                points: calls,
                dim,
            });
        }

        let mut acc = BatchEstimators::default();
        for x in samples.chunks(dim) {
            // the weight scales every value before accumulation, so the reduced mean and
            // standard error come out scaled as well
            acc.update(self.weight * self.integrand.call(x));
        }

        Ok(acc)
    }
}

/// Estimates `weight` times the expectation of `integrand` under `distribution` from `npoints`
/// sample points.
///
/// Written as an integral this computes `weight * ∫ f(x) g(x) dx`, where `g` is the density the
/// distribution draws from. The estimate is the sample mean of the weighted values and its
/// standard error is `sqrt(V / N)` with the population variance `V` of those values. The work is
/// distributed according to `config`; see [`RunConfig`] for batching, worker and seeding knobs.
///
/// # Errors
///
/// Returns a validation error before any sampling starts if fewer than two points are requested,
/// the worker pool would be empty, or an explicit batch size of zero was given; a
/// [`QuadratureError::DimensionMismatch`] if distribution and integrand disagree on the sample
/// dimension; a [`QuadratureError::SampleCountMismatch`] if the distribution returns a different
/// number of values than requested; and a [`QuadratureError::WorkerFailure`] if user code panics
/// inside a worker. A failed call abandons its remaining batches and returns no partial result.
pub fn integrate<T, I, D>(
    integrand: &I,
    distribution: &D,
    npoints: usize,
    weight: T,
    config: &RunConfig,
) -> Result<EstimationResult<T>, QuadratureError>
where
    T: Float + FromPrimitive + Send + Sync,
    I: Integrand<T>,
    D: SampleDistribution<T>,
{
    config.validate(npoints)?;

    if distribution.dim() == 0 {
        return Err(QuadratureError::EmptyRegion);
    }
    if distribution.dim() != integrand.dim() {
        return Err(QuadratureError::DimensionMismatch {
            domain: distribution.dim(),
            integrand: integrand.dim(),
        });
    }

    let kernel = ImportanceKernel {
        integrand,
        distribution,
        weight,
    };
    let acc = dispatch(&kernel, npoints, config)?;

    Ok(EstimationResult::new(acc.mean(), acc.std_error()))
}
