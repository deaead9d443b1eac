//! AVX2 backend implementation with modular operation-centric organization
//!
//! Operations live in `ops/`, one module per primitive with a file per
//! element type. `dispatch` maps the element type to its implementation at
//! compile time.

mod dispatch;
mod ops;
mod utils;

use crate::cpu::{CpuFeatureLevel, CpuFeatures};
use crate::primitives::ComputePrimitives;
use crate::Numeric;

/// AVX2 + FMA backend for x86_64 processors
#[derive(Clone, Copy, Debug)]
pub struct Avx2Backend;

impl Avx2Backend {
    /// Create a new AVX2 backend
    ///
    /// # Panics
    /// Panics if the CPU doesn't support AVX2 and FMA instructions
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        if !Self::is_available() {
            panic!("AVX2 backend requested but CPU doesn't support AVX2 and FMA instructions");
        }
        Self
    }

    /// Check if AVX2 and FMA are available on this CPU
    pub fn is_available() -> bool {
        CpuFeatureLevel::detected_features().contains(CpuFeatures::AVX2 | CpuFeatures::FMA)
    }
}

// Kernel factories build backends through `Default`; they are only invoked
// after the dispatcher has checked the CPU level.
impl Default for Avx2Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComputePrimitives<T> for Avx2Backend
where
    T: Numeric + self::dispatch::Avx2TypeDispatch,
{
    fn backend_name(&self) -> &'static str {
        T::backend_name()
    }

    fn level(&self) -> CpuFeatureLevel {
        CpuFeatureLevel::Avx2
    }

    fn simd_width(&self) -> usize {
        T::simd_width()
    }

    fn sum(&self, data: &[T]) -> f64 {
        // Safety: We checked CPU support in new()
        unsafe { T::sum_impl(self, data) }
    }

    fn dot_product(&self, a: &[T], b: &[T]) -> f64 {
        // Safety: We checked CPU support in new()
        unsafe { T::dot_product_impl(self, a, b) }
    }

    fn axpy(&self, alpha: T, x: &[T], y: &mut [T]) {
        // Safety: We checked CPU support in new()
        unsafe { T::axpy_impl(self, alpha, x, y) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::ScalarBackend;
    use approx::assert_relative_eq;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64) * 0.5 - 3.0).collect()
    }

    #[test]
    fn test_matches_scalar_f64() {
        if !Avx2Backend::is_available() {
            return;
        }
        let simd = Avx2Backend::new();
        let scalar = ScalarBackend::new();
        for n in [0, 1, 3, 4, 7, 16, 33] {
            let a = ramp(n);
            let b: Vec<f64> = a.iter().map(|v| v * 1.5 + 1.0).collect();
            assert_relative_eq!(
                ComputePrimitives::<f64>::sum(&simd, &a),
                ComputePrimitives::<f64>::sum(&scalar, &a),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                ComputePrimitives::<f64>::dot_product(&simd, &a, &b),
                ComputePrimitives::<f64>::dot_product(&scalar, &a, &b),
                epsilon = 1e-9
            );

            let mut y1 = b.clone();
            let mut y2 = b.clone();
            ComputePrimitives::<f64>::axpy(&simd, 2.0, &a, &mut y1);
            ComputePrimitives::<f64>::axpy(&scalar, 2.0, &a, &mut y2);
            for (u, v) in y1.iter().zip(y2.iter()) {
                assert_relative_eq!(*u, *v, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_matches_scalar_f32() {
        if !Avx2Backend::is_available() {
            return;
        }
        let simd = Avx2Backend::new();
        let scalar = ScalarBackend::new();
        for n in [0, 1, 5, 8, 9, 31] {
            let a: Vec<f32> = ramp(n).into_iter().map(|v| v as f32).collect();
            let b: Vec<f32> = a.iter().map(|v| v * 0.25 - 2.0).collect();
            assert_relative_eq!(
                ComputePrimitives::<f32>::sum(&simd, &a),
                ComputePrimitives::<f32>::sum(&scalar, &a),
                epsilon = 1e-9
            );
            assert_relative_eq!(
                ComputePrimitives::<f32>::dot_product(&simd, &a, &b),
                ComputePrimitives::<f32>::dot_product(&scalar, &a, &b),
                epsilon = 1e-6
            );

            let mut y1 = b.clone();
            let mut y2 = b.clone();
            ComputePrimitives::<f32>::axpy(&simd, -0.5, &a, &mut y1);
            ComputePrimitives::<f32>::axpy(&scalar, -0.5, &a, &mut y2);
            for (u, v) in y1.iter().zip(y2.iter()) {
                assert_relative_eq!(*u, *v, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_reports_level() {
        if !Avx2Backend::is_available() {
            return;
        }
        let simd = Avx2Backend::new();
        assert_eq!(ComputePrimitives::<f64>::level(&simd), CpuFeatureLevel::Avx2);
        assert_eq!(ComputePrimitives::<f32>::simd_width(&simd), 8);
        assert_eq!(ComputePrimitives::<f64>::simd_width(&simd), 4);
    }
}
