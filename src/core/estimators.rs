//! This module contains everything related to estimators.

use num_traits::{Float, FromPrimitive};
use std::ops::Add;

/// Basic estimators, like the mean, variance, and the standard deviation.
pub trait BasicEstimators<T: Float> {
    /// Returns the mean value.
    fn mean(&self) -> T;

    /// Returns the population variance, `V = <f^2> - <f>^2`.
    fn var(&self) -> T;

    /// Returns the standard deviation of the sampled values, `sigma = sqrt(V)`.
    fn std(&self) -> T {
        self.var().sqrt()
    }
}

/// More estimators.
pub trait Estimators<T: Float + FromPrimitive>: BasicEstimators<T> {
    /// Returns the number of times, `N`, the integrand has been called.
    fn calls(&self) -> usize;

    /// Returns the number of times the integrand has been called and its return value was
    /// non-finite.
    fn non_finite_calls(&self) -> usize;

    /// Returns the number of times the integrand has been called and its return value was
    /// non-zero.
    fn non_zero_calls(&self) -> usize;

    /// Returns the standard error of the mean, `sqrt(V / N)`.
    fn std_error(&self) -> T {
        (self.var() / T::from_usize(self.calls()).unwrap()).sqrt()
    }
}

/// A running sum with Neumaier compensation.
///
/// Keeps a second float holding the low-order bits that plain summation drops, so that folding
/// many values of similar magnitude, or values offset far from zero, does not lose the digits the
/// variance estimate is computed from later.
#[derive(Clone, Copy, Debug)]
struct CompensatedSum<T> {
    sum: T,
    compensation: T,
}

impl<T: Float> CompensatedSum<T> {
    fn zero() -> Self {
        Self {
            sum: T::zero(),
            compensation: T::zero(),
        }
    }

    fn add(&mut self, value: T) {
        let t = self.sum + value;
        // whichever operand is smaller in magnitude has its low-order bits cut off
        if self.sum.abs() >= value.abs() {
            self.compensation = self.compensation + ((self.sum - t) + value);
        } else {
            self.compensation = self.compensation + ((value - t) + self.sum);
        }
        self.sum = t;
    }

    /// Fold another compensated sum into this one.
    fn merge(&mut self, other: Self) {
        self.add(other.sum);
        self.add(other.compensation);
    }

    fn total(&self) -> T {
        self.sum + self.compensation
    }
}

/// The statistics of one batch: the call counters together with the compensated first and second
/// moments of the evaluated values.
///
/// One accumulator is filled per batch, single-threaded. The partial results of all batches are
/// afterwards merged with [`Add`]; the counters and both moments each sum independently, so the
/// mathematical result does not depend on the merge order.
#[derive(Clone, Debug)]
pub struct BatchEstimators<T> {
    calls: usize,
    non_finite_calls: usize,
    non_zero_calls: usize,
    sum: CompensatedSum<T>,
    sumsq: CompensatedSum<T>,
}

impl<T: Float> Default for BatchEstimators<T> {
    fn default() -> Self {
        Self {
            calls: 0,
            non_finite_calls: 0,
            non_zero_calls: 0,
            sum: CompensatedSum::zero(),
            sumsq: CompensatedSum::zero(),
        }
    }
}

impl<T: Float> BatchEstimators<T> {
    /// Folds a single evaluated value into the batch statistics.
    ///
    /// Zero values only bump the call counter. Non-finite values are dropped from the moments and
    /// counted separately, so a stray `inf` or `nan` cannot destroy the whole integration.
    pub fn update(&mut self, value: T) {
        self.calls += 1;

        if value != T::zero() {
            self.non_zero_calls += 1;

            if value.is_finite() {
                self.sum.add(value);
                self.sumsq.add(value * value);
            } else {
                self.non_finite_calls += 1;
            }
        }
    }
}

impl<T: Float> Add for BatchEstimators<T> {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self.calls += other.calls;
        self.non_finite_calls += other.non_finite_calls;
        self.non_zero_calls += other.non_zero_calls;
        self.sum.merge(other.sum);
        self.sumsq.merge(other.sumsq);
        self
    }
}

impl<T: Float + FromPrimitive> BasicEstimators<T> for BatchEstimators<T> {
    fn mean(&self) -> T {
        self.sum.total() / T::from_usize(self.calls).unwrap()
    }

    fn var(&self) -> T {
        let calls = T::from_usize(self.calls).unwrap();
        let mean = self.sum.total() / calls;
        // rounding can push the difference slightly below zero for constant integrands
        (self.sumsq.total() / calls - mean * mean).max(T::zero())
    }
}

impl<T: Float + FromPrimitive> Estimators<T> for BatchEstimators<T> {
    fn calls(&self) -> usize {
        self.calls
    }

    fn non_finite_calls(&self) -> usize {
        self.non_finite_calls
    }

    fn non_zero_calls(&self) -> usize {
        self.non_zero_calls
    }
}

/// The outcome of a quadrature call: the integral estimate together with its standard error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimationResult<T> {
    value: T,
    standard_error: T,
}

impl<T: Copy> EstimationResult<T> {
    /// Constructor.
    pub(crate) const fn new(value: T, standard_error: T) -> Self {
        Self {
            value,
            standard_error,
        }
    }

    /// Returns the estimated value of the integral.
    pub const fn value(&self) -> T {
        self.value
    }

    /// Returns the standard error of the estimate.
    pub const fn standard_error(&self) -> T {
        self.standard_error
    }
}
