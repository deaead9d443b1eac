//! Compile-time dispatch system for AVX2 type-specific implementations

use super::ops::{Axpy, DotProduct, Sum};
use super::Avx2Backend;
use crate::Numeric;

/// Trait for type-specific AVX2 dispatch
///
/// Implemented for each supported element type, so the backend picks the
/// right intrinsic path without runtime checks.
pub trait Avx2TypeDispatch: Numeric + Sum<Self> + DotProduct<Self> + Axpy<Self> {
    fn backend_name() -> &'static str;
    fn simd_width() -> usize;

    unsafe fn sum_impl(backend: &Avx2Backend, data: &[Self]) -> f64 {
        <Self as Sum<Self>>::compute(backend, data)
    }

    unsafe fn dot_product_impl(backend: &Avx2Backend, a: &[Self], b: &[Self]) -> f64 {
        <Self as DotProduct<Self>>::compute(backend, a, b)
    }

    unsafe fn axpy_impl(backend: &Avx2Backend, alpha: Self, x: &[Self], y: &mut [Self]) {
        <Self as Axpy<Self>>::compute(backend, alpha, x, y)
    }
}

impl Avx2TypeDispatch for f32 {
    fn backend_name() -> &'static str {
        "avx2"
    }

    fn simd_width() -> usize {
        8 // AVX2 processes 8 f32s at once
    }
}

impl Avx2TypeDispatch for f64 {
    fn backend_name() -> &'static str {
        "avx2"
    }

    fn simd_width() -> usize {
        4 // AVX2 processes 4 f64s at once
    }
}
