//! Shared utilities for AVX2 implementations

use std::arch::x86_64::*;

/// Horizontal sum of a __m256d (4 f64s)
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_sum_pd(v: __m256d) -> f64 {
    // Extract high and low 128-bit lanes
    let high = _mm256_extractf128_pd(v, 1);
    let low = _mm256_castpd256_pd128(v);

    let sum128 = _mm_add_pd(high, low);
    let sum = _mm_hadd_pd(sum128, sum128);

    _mm_cvtsd_f64(sum)
}

/// Load 4 f32s and widen them to a __m256d
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn load_widen_ps(ptr: *const f32) -> __m256d {
    _mm256_cvtps_pd(_mm_loadu_ps(ptr))
}
