//! AVX2 axpy implementation for f32

use crate::primitives::backends::avx2::Avx2Backend;
use std::arch::x86_64::*;

#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn axpy_f32(_backend: &Avx2Backend, alpha: f32, x: &[f32], y: &mut [f32]) {
    let n = x.len().min(y.len());
    let chunks = n / 8;
    let alpha_vec = _mm256_set1_ps(alpha);

    for i in 0..chunks {
        let offset = i * 8;
        let x_vec = _mm256_loadu_ps(x.as_ptr().add(offset));
        let y_ptr = y.as_mut_ptr().add(offset);
        let y_vec = _mm256_loadu_ps(y_ptr);
        _mm256_storeu_ps(y_ptr, _mm256_fmadd_ps(alpha_vec, x_vec, y_vec));
    }

    for i in chunks * 8..n {
        y[i] += alpha * x[i];
    }
}
