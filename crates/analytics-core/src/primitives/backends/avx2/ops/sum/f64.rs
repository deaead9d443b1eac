//! AVX2 sum implementation for f64

use crate::primitives::backends::avx2::utils::horizontal_sum_pd;
use crate::primitives::backends::avx2::Avx2Backend;
use std::arch::x86_64::*;

/// AVX2 implementation of sum for f64
#[target_feature(enable = "avx2")]
pub unsafe fn sum_f64(_backend: &Avx2Backend, data: &[f64]) -> f64 {
    let n = data.len();
    if n == 0 {
        return 0.0;
    }

    let chunks = n / 4;
    let mut sum_vec = _mm256_setzero_pd();

    for i in 0..chunks {
        let data_vec = _mm256_loadu_pd(data.as_ptr().add(i * 4));
        sum_vec = _mm256_add_pd(sum_vec, data_vec);
    }

    let mut sum = horizontal_sum_pd(sum_vec);
    for &v in &data[chunks * 4..] {
        sum += v;
    }

    sum
}
