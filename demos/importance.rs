use mcquad::core::*;
use mcquad::integrators::importance;

use rand::RngCore;
use rand_distr::{Distribution, Exp};

/// Unit exponential sampling distribution in one dimension.
struct Exponential;

impl SampleDistribution<f64> for Exponential {
    fn dim(&self) -> usize {
        1
    }

    fn sample(&self, rng: &mut dyn RngCore, n: usize) -> Vec<f64> {
        let exp = Exp::new(1.0).expect("valid rate");
        (0..n).map(|_| exp.sample(rng)).collect()
    }
}

/// The indicator of x < 1.
struct BelowOne;

impl Integrand<f64> for BelowOne {
    fn call(&self, x: &[f64]) -> f64 {
        if x[0] < 1.0 {
            1.0
        } else {
            0.0
        }
    }

    fn dim(&self) -> usize {
        1
    }
}

/// Integrating e^-x over x = 0..1 by sampling from the exponential distribution and counting
/// how often a sample lands below one. The exact result is 1 - e^-1, roughly 0.6321.
fn main() {
    let config = RunConfig::new()
        .with_workers(num_cpus::get())
        .with_seed(Seed::new(0xcafe_f00d_d15e_a5e5, 0xa02b_dbf7_bb3c_0a7a));

    let result = importance::integrate(&BelowOne, &Exponential, 1_000_000, 1.0, &config)
        .expect("integration succeeds");

    println!("{} +- {}", result.value(), result.standard_error());
}
