//! AVX2 sum implementation for f32

use crate::primitives::backends::avx2::utils::{horizontal_sum_pd, load_widen_ps};
use crate::primitives::backends::avx2::Avx2Backend;
use std::arch::x86_64::*;

/// AVX2 implementation of sum for f32
///
/// Lanes are widened before accumulation so long sums keep f64 accuracy.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_f32(_backend: &Avx2Backend, data: &[f32]) -> f64 {
    let n = data.len();
    if n == 0 {
        return 0.0;
    }

    let chunks = n / 8;
    let mut lo = _mm256_setzero_pd();
    let mut hi = _mm256_setzero_pd();

    for i in 0..chunks {
        let ptr = data.as_ptr().add(i * 8);
        lo = _mm256_add_pd(lo, load_widen_ps(ptr));
        hi = _mm256_add_pd(hi, load_widen_ps(ptr.add(4)));
    }

    let mut sum = horizontal_sum_pd(_mm256_add_pd(lo, hi));
    for &v in &data[chunks * 8..] {
        sum += v as f64;
    }

    sum
}
