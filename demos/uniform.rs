use mcquad::core::*;
use mcquad::integrators::uniform;

/// The integrand e^-|x|^2 in three dimensions.
struct Gaussian;

impl Integrand<f64> for Gaussian {
    fn call(&self, x: &[f64]) -> f64 {
        (-x.iter().map(|v| v * v).sum::<f64>()).exp()
    }

    fn dim(&self) -> usize {
        3
    }
}

/// Integrating e^-|x|^2 over the cube [-1, 1]^3, which gives (sqrt(pi) * erf(1))^3, roughly
/// 3.332.
fn main() {
    let region = HyperRectangle::new(vec![-1.0; 3], vec![1.0; 3]).expect("valid bounds");

    // spread the work across all physical cores; the seed makes the run reproducible
    let config = RunConfig::new()
        .with_workers(num_cpus::get())
        .with_seed(Seed::new(0xcafe_f00d_d15e_a5e5, 0xa02b_dbf7_bb3c_0a7a));

    let result = uniform::integrate(&Gaussian, &region, 1_000_000, &config)
        .expect("integration succeeds");

    println!("{} +- {}", result.value(), result.standard_error());
}
