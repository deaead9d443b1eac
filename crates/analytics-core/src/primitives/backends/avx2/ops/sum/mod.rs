//! Sum operation for AVX2 backend

mod f32;
mod f64;

use crate::{primitives::backends::avx2::Avx2Backend, Numeric};

/// Trait for sum operation
pub trait Sum<T: Numeric> {
    /// Compute sum with AVX2 optimizations, accumulating in f64
    unsafe fn compute(backend: &Avx2Backend, data: &[T]) -> f64;
}

impl Sum<f32> for f32 {
    unsafe fn compute(backend: &Avx2Backend, data: &[f32]) -> f64 {
        f32::sum_f32(backend, data)
    }
}

impl Sum<f64> for f64 {
    unsafe fn compute(backend: &Avx2Backend, data: &[f64]) -> f64 {
        f64::sum_f64(backend, data)
    }
}
