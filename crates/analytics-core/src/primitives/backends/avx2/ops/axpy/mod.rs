//! Scaled vector addition (y += alpha * x) for AVX2 backend

mod f32;
mod f64;

use crate::{primitives::backends::avx2::Avx2Backend, Numeric};

/// Trait for axpy operation
pub trait Axpy<T: Numeric> {
    unsafe fn compute(backend: &Avx2Backend, alpha: T, x: &[T], y: &mut [T]);
}

impl Axpy<f32> for f32 {
    unsafe fn compute(backend: &Avx2Backend, alpha: f32, x: &[f32], y: &mut [f32]) {
        f32::axpy_f32(backend, alpha, x, y)
    }
}

impl Axpy<f64> for f64 {
    unsafe fn compute(backend: &Avx2Backend, alpha: f64, x: &[f64], y: &mut [f64]) {
        f64::axpy_f64(backend, alpha, x, y)
    }
}
