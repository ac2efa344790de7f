//! Uniform quadrature over an axis-aligned hyper-rectangle.

use crate::core::estimators::{BasicEstimators, BatchEstimators, EstimationResult, Estimators};
use crate::core::{HyperRectangle, Integrand, QuadratureError, RunConfig};
use crate::integrators::{dispatch, BatchKernel};

use num_traits::{Float, FromPrimitive};
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use rand_pcg::Pcg64;

/// Samples points uniformly in the rectangle and evaluates the integrand on them.
struct UniformKernel<'a, T, I> {
    integrand: &'a I,
    region: &'a HyperRectangle<T>,
}

impl<'a, T, I> BatchKernel<T> for UniformKernel<'a, T, I>
where
    T: Float + Send + Sync,
    I: Integrand<T>,
    Standard: Distribution<T>,
{
    fn run(&self, rng: &mut Pcg64, calls: usize) -> Result<BatchEstimators<T>, QuadratureError> {
        // reuse one buffer for the sampled coordinates instead of allocating per call
        let mut x = vec![T::zero(); self.region.dim()];
        let mut acc = BatchEstimators::default();

        for _ in 0..calls {
            for (v, (&lo, &hi)) in x
                .iter_mut()
                .zip(self.region.lower().iter().zip(self.region.upper()))
            {
                *v = lo + (hi - lo) * rng.gen::<T>();
            }

            acc.update(self.integrand.call(&x));
        }

        Ok(acc)
    }
}

/// Estimates the integral of `integrand` over `region` using `npoints` uniformly distributed
/// sample points.
///
/// The estimate is the rectangle volume times the sample mean of the integrand; its standard
/// error is the volume times `sqrt(V / N)`, where `V` is the population variance of the sampled
/// values. The work is distributed according to `config`; see [`RunConfig`] for batching, worker
/// and seeding knobs.
///
/// # Errors
///
/// Returns a validation error before any sampling starts if fewer than two points are requested,
/// the worker pool would be empty, or an explicit batch size of zero was given; a
/// [`QuadratureError::DimensionMismatch`] if the integrand does not expect points of the
/// region's dimension; and a [`QuadratureError::WorkerFailure`] if the integrand panics, in
/// which case the remaining batches are abandoned and no partial result is returned.
pub fn integrate<T, I>(
    integrand: &I,
    region: &HyperRectangle<T>,
    npoints: usize,
    config: &RunConfig,
) -> Result<EstimationResult<T>, QuadratureError>
where
    T: Float + FromPrimitive + Send + Sync,
    I: Integrand<T>,
    Standard: Distribution<T>,
{
    config.validate(npoints)?;

    if region.dim() != integrand.dim() {
        return Err(QuadratureError::DimensionMismatch {
            domain: region.dim(),
            integrand: integrand.dim(),
        });
    }

    let kernel = UniformKernel { integrand, region };
    let acc = dispatch(&kernel, npoints, config)?;

    let volume = region.volume();

    Ok(EstimationResult::new(
        volume * acc.mean(),
        volume * acc.std_error(),
    ))
}
