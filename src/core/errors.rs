//! The error types reported by the quadrature routines.

use crate::core::Seed;
use thiserror::Error;

/// Everything that can go wrong during a quadrature call.
///
/// The variants fall into three groups: argument validation, which is performed before any
/// sampling work starts; contract violations by a user-supplied sampling distribution; and
/// failures raised from inside a worker while evaluating user code. A failed call never returns a
/// partial result.
#[derive(Debug, Error)]
pub enum QuadratureError {
    /// The lower and upper bounds of the integration region have different lengths.
    #[error("integration bounds have mismatched dimensions: xl has {lower}, xu has {upper}")]
    BoundsMismatch {
        /// Number of lower bounds given.
        lower: usize,
        /// Number of upper bounds given.
        upper: usize,
    },

    /// The integration region has no dimensions at all.
    #[error("the integration region must have at least one dimension")]
    EmptyRegion,

    /// Fewer than two sample points were requested; the standard error is undefined below that.
    #[error("at least two sample points are required, got {0}")]
    NotEnoughPoints(usize),

    /// The worker pool would be empty.
    #[error("at least one worker is required, got {0}")]
    NotEnoughWorkers(usize),

    /// An explicit batch size of zero was requested.
    #[error("batches must contain at least one point")]
    EmptyBatches,

    /// The sampling distribution returned a different number of values than requested.
    #[error(
        "the sampling distribution returned {actual} values where {expected} were requested \
         ({points} points of dimension {dim})"
    )]
    SampleCountMismatch {
        /// Number of values the distribution was asked for, `points * dim`.
        expected: usize,
        /// Number of values the distribution actually returned.
        actual: usize,
        /// Number of sample points requested from the distribution.
        points: usize,
        /// Dimension of a single sample point.
        dim: usize,
    },

    /// The sample source and the integrand disagree on the sample dimension.
    #[error(
        "the sample source produces points of dimension {domain}, but the integrand expects \
         dimension {integrand}"
    )]
    DimensionMismatch {
        /// Dimension of the points produced by the region or sampling distribution.
        domain: usize,
        /// Dimension expected by the integrand.
        integrand: usize,
    },

    /// User code panicked inside a worker. The batch index and its seed reproduce the failure.
    #[error("worker failed while evaluating batch {batch} (seed {seed:?}): {message}")]
    WorkerFailure {
        /// Index of the batch that was being evaluated.
        batch: usize,
        /// Seed of the failing call, if one was given.
        seed: Option<Seed>,
        /// Panic payload, if it was a string.
        message: String,
    },
}

impl QuadratureError {
    /// Returns `true` for errors raised by argument validation, before any sampling work.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::BoundsMismatch { .. }
                | Self::EmptyRegion
                | Self::NotEnoughPoints(_)
                | Self::NotEnoughWorkers(_)
                | Self::EmptyBatches
        )
    }

    /// Returns `true` for violations of the sampling distribution contract.
    pub fn is_contract(&self) -> bool {
        matches!(
            self,
            Self::SampleCountMismatch { .. } | Self::DimensionMismatch { .. }
        )
    }
}
