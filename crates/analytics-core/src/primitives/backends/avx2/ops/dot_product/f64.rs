//! AVX2 dot product implementation for f64

use crate::primitives::backends::avx2::utils::horizontal_sum_pd;
use crate::primitives::backends::avx2::Avx2Backend;
use std::arch::x86_64::*;

/// AVX2 implementation of dot product for f64
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn dot_product_f64(_backend: &Avx2Backend, a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let chunks = n / 4;
    let mut sum_vec = _mm256_setzero_pd();

    for i in 0..chunks {
        let offset = i * 4;
        let a_vec = _mm256_loadu_pd(a.as_ptr().add(offset));
        let b_vec = _mm256_loadu_pd(b.as_ptr().add(offset));
        sum_vec = _mm256_fmadd_pd(a_vec, b_vec, sum_vec);
    }

    let mut sum = horizontal_sum_pd(sum_vec);
    for i in chunks * 4..n {
        sum += a[i] * b[i];
    }

    sum
}
