//! AVX2 axpy implementation for f64

use crate::primitives::backends::avx2::Avx2Backend;
use std::arch::x86_64::*;

#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn axpy_f64(_backend: &Avx2Backend, alpha: f64, x: &[f64], y: &mut [f64]) {
    let n = x.len().min(y.len());
    let chunks = n / 4;
    let alpha_vec = _mm256_set1_pd(alpha);

    for i in 0..chunks {
        let offset = i * 4;
        let x_vec = _mm256_loadu_pd(x.as_ptr().add(offset));
        let y_ptr = y.as_mut_ptr().add(offset);
        let y_vec = _mm256_loadu_pd(y_ptr);
        _mm256_storeu_pd(y_ptr, _mm256_fmadd_pd(alpha_vec, x_vec, y_vec));
    }

    for i in chunks * 4..n {
        y[i] += alpha * x[i];
    }
}
