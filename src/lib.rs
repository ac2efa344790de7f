#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

//! The crate `mcquad` provides [Monte Carlo integration] routines, which allow to approximate
//! definite multi-dimensional [integrals] together with a statistical error estimate. Two
//! estimators are offered: uniform quadrature over an axis-aligned hyper-rectangle and
//! importance-sampling quadrature with a user-supplied sampling distribution.
//!
//! # Features
//!
//! This library was designed with the following features as essential in mind:
//!
//! - **Generic numeric type**. The numeric type used in this library is not fixed, but instead a
//! generic parameter, so that the integration routines can be used with either `f32`, `f64`, or a
//! custom numeric type that implements the `Float` trait from the `num-traits` crate.
//! - **Reproducibility**. When an explicit [`Seed`] is given, the result only depends on the seed
//! and the chosen batch partition. Every batch owns a private random number stream derived from
//! the seed and the batch index, so batches never replay each other's numbers, and the reduction
//! of the partial results is performed in a fixed order. Running the identical call twice returns
//! bit-identical results. Without a seed, every batch draws fresh entropy and runs are
//! non-reproducible by design.
//! - **Parallel batching**. The requested sample size is split into batches that are processed by
//! a bounded pool of worker threads. Workers share nothing mutable; each batch is reduced to its
//! first and second moments and the partial moments are merged afterwards.
//! - **Stable accumulation**. Per-batch moments are accumulated with compensated (Neumaier)
//! summation, so that the variance estimate does not fall apart for large sample sizes or for
//! integrands offset far from zero.
//! - **Fail-fast validation**. All arguments are checked before any sampling work starts, and a
//! panic inside user code aborts the whole call with the failing batch and its seed attached.
//! - **Non-finite number filtering**. The estimators filter out non-finite numbers such as `inf`
//! or `nan`, which integrands sometimes produce in extreme regions of their integration domain
//! due to finite numerical precision. When this happens the value is dropped from the moments and
//! a counter is increased that keeps track of how often this happened.
//! - **Zero tracking**. If your integrand returns zero, another counter will be increased to keep
//! track of the efficiency of the integration.
//!
//! # What is ...?
//!
//! This section is a dictionary of terms that are used in this documentation. Given
//!
//! ```text
//! I = ∫ dx f(x),    x in [xl_1, xu_1] × ... × [xl_d, xu_d]
//! ```
//!
//! we approximate `I` using uniform Monte Carlo quadrature with
//!
//! ```text
//! I ≈ V/N ∑_j f(x_j),    V = ∏_i (xu_i - xl_i)
//! ```
//!
//! where the points `x_j` are uniformly distributed in the rectangle. For importance sampling the
//! points are instead drawn from a user distribution `g` and `w/N ∑_j f(x_j)` estimates `w` times
//! the expectation of `f` under `g`. We use the following terms:
//!
//! - the *sample size*, `N`, is the number of times the integrand is evaluated. We assume that
//! this is the expensive operation;
//! - the *integrand* is the function, `f`, that is being integrated;
//! - the number of *dimensions*, `d`, is the number of dimensions of the integration domain;
//! - a *batch* is an independently-seeded group of sample points processed as one indivisible
//! unit of parallel work;
//! - the *standard error* is the estimated standard deviation of the mean, `sqrt(V[f] / N)`;
//! - *efficiency* is the percentage of times the integrand evaluated to a value different from
//! zero. If your integrand returns zero very often, for example in 99% of the time, then the
//! efficiency is only 1%. This number should not be too small, otherwise it is possible that the
//! statistical uncertainties are underestimated.
//!
//! [Monte Carlo integration]: https://en.wikipedia.org/wiki/Monte_Carlo_integration
//! [integrals]: https://en.wikipedia.org/wiki/Integral

pub mod core;
pub mod integrators;

pub use crate::core::*;
