//! AVX2 dot product implementation for f32

use crate::primitives::backends::avx2::utils::{horizontal_sum_pd, load_widen_ps};
use crate::primitives::backends::avx2::Avx2Backend;
use std::arch::x86_64::*;

/// AVX2 implementation of dot product for f32, widened to f64 per lane
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn dot_product_f32(_backend: &Avx2Backend, a: &[f32], b: &[f32]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let chunks = n / 4;
    let mut sum_vec = _mm256_setzero_pd();

    for i in 0..chunks {
        let offset = i * 4;
        let a_vec = load_widen_ps(a.as_ptr().add(offset));
        let b_vec = load_widen_ps(b.as_ptr().add(offset));
        sum_vec = _mm256_fmadd_pd(a_vec, b_vec, sum_vec);
    }

    let mut sum = horizontal_sum_pd(sum_vec);
    for i in chunks * 4..n {
        sum += a[i] as f64 * b[i] as f64;
    }

    sum
}
