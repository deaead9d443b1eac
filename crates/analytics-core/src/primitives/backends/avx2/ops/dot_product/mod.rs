//! Dot product operation for AVX2 backend

mod f32;
mod f64;

use crate::{primitives::backends::avx2::Avx2Backend, Numeric};

/// Trait for dot product operation
pub trait DotProduct<T: Numeric> {
    /// Compute dot product with AVX2 optimizations, accumulating in f64
    unsafe fn compute(backend: &Avx2Backend, a: &[T], b: &[T]) -> f64;
}

impl DotProduct<f32> for f32 {
    unsafe fn compute(backend: &Avx2Backend, a: &[f32], b: &[f32]) -> f64 {
        f32::dot_product_f32(backend, a, b)
    }
}

impl DotProduct<f64> for f64 {
    unsafe fn compute(backend: &Avx2Backend, a: &[f64], b: &[f64]) -> f64 {
        f64::dot_product_f64(backend, a, b)
    }
}
