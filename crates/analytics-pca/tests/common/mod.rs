//! Shared utilities for PCA integration tests

#![allow(dead_code)]

use analytics_core::{DenseTable, Numeric, NumericTable};
use analytics_pca::PcaModel;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

pub use approx::assert_relative_eq;

/// Three correlated columns: `a`, `a + small noise`, independent `b`
pub fn correlated(seed: u64, n_rows: usize) -> DenseTable<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut data = Vec::with_capacity(n_rows * 3);
    for _ in 0..n_rows {
        let a: f64 = normal.sample(&mut rng);
        let b: f64 = normal.sample(&mut rng);
        let e: f64 = normal.sample(&mut rng);
        data.extend([10.0 + 2.0 * a, -3.0 + 2.0 * a + 0.1 * e, 5.0 * b]);
    }
    DenseTable::from_rows(3, data).unwrap()
}

pub fn to_f32(table: &DenseTable<f64>) -> DenseTable<f32> {
    DenseTable::from_fn(table.n_rows(), table.n_columns(), |r, c| table.get(r, c) as f32)
}

pub fn blocks<T: Numeric>(table: &DenseTable<T>, rows: usize) -> Vec<DenseTable<T>> {
    (0..table.n_rows())
        .step_by(rows)
        .map(|start| table.row_block(start..(start + rows).min(table.n_rows())))
        .collect()
}

pub fn as_input<T: Numeric>(table: &DenseTable<T>) -> &dyn NumericTable<T> {
    table
}

pub fn assert_models_close<T: Numeric>(a: &PcaModel<T>, b: &PcaModel<T>, tol: f64) {
    assert_eq!(a.n_components(), b.n_components());
    let close = |u: &[T], v: &[T]| {
        for (x, y) in u.iter().zip(v) {
            assert_relative_eq!(x.widen(), y.widen(), epsilon = tol, max_relative = tol);
        }
    };
    close(a.eigenvalues(), b.eigenvalues());
    close(a.means(), b.means());
    close(a.variances(), b.variances());
    for i in 0..a.n_components() {
        close(a.eigenvector(i), b.eigenvector(i));
    }
}
