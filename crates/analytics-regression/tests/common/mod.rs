//! Shared utilities for regression integration tests

#![allow(dead_code)]

use analytics_core::{DenseTable, Environment, ErrorPolicy, Numeric, NumericTable};
use analytics_regression::RegressionModel;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, Uniform};

pub use approx::assert_relative_eq;

/// `y = 2x + 1` over `x = offset .. offset + n`
pub fn line<T: Numeric>(n: usize, offset: usize) -> (DenseTable<T>, DenseTable<T>) {
    let x = DenseTable::from_fn(n, 1, |r, _| T::narrow((r + offset) as f64));
    let y = DenseTable::from_fn(n, 1, |r, _| T::narrow(2.0 * (r + offset) as f64 + 1.0));
    (x, y)
}

/// Random design with known coefficients and Gaussian noise
///
/// Response `k` uses intercept `k + 1` and coefficient `(j + 1) * (-1)^k` on
/// feature `j`.
pub fn noisy_problem(
    seed: u64,
    n_rows: usize,
    n_features: usize,
    n_responses: usize,
    noise: f64,
) -> (DenseTable<f64>, DenseTable<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let uniform = Uniform::new(-5.0, 5.0);
    let x = DenseTable::from_fn(n_rows, n_features, |_, _| uniform.sample(&mut rng));
    let normal = Normal::new(0.0, noise.max(f64::MIN_POSITIVE)).unwrap();
    let y = DenseTable::from_fn(n_rows, n_responses, |r, k| {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        let mut v = (k + 1) as f64;
        for j in 0..n_features {
            v += sign * (j + 1) as f64 * x.get(r, j);
        }
        v + if noise > 0.0 { normal.sample(&mut rng) } else { 0.0 }
    });
    (x, y)
}

/// Split a table into consecutive row blocks of `rows` each
pub fn blocks<T: Numeric>(table: &DenseTable<T>, rows: usize) -> Vec<DenseTable<T>> {
    (0..table.n_rows())
        .step_by(rows)
        .map(|start| table.row_block(start..(start + rows).min(table.n_rows())))
        .collect()
}

pub fn accumulate() -> Environment {
    Environment::detect().with_error_policy(ErrorPolicy::Accumulate)
}

pub fn assert_models_close<T: Numeric>(a: &RegressionModel<T>, b: &RegressionModel<T>, tol: f64) {
    assert_eq!(a.n_features(), b.n_features());
    assert_eq!(a.n_responses(), b.n_responses());
    for (u, v) in a.beta().iter().zip(b.beta()) {
        assert_relative_eq!(u.widen(), v.widen(), epsilon = tol, max_relative = tol);
    }
}

/// Intercept and slope of the first response
pub fn line_coefficients<T: Numeric>(model: &RegressionModel<T>) -> [f64; 2] {
    [model.intercept(0).widen(), model.coefficients(0)[0].widen()]
}
