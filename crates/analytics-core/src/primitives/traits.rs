//! Generic compute primitives trait

use crate::cpu::CpuFeatureLevel;
use crate::numeric::Numeric;
use std::fmt::Debug;

/// Low-level vector operations shared by all kernels
///
/// Reductions return the `f64` aggregate regardless of the element type.
/// Backends override the defaults with SIMD code where it pays off.
pub trait ComputePrimitives<T: Numeric = f64>: Clone + Send + Sync + Debug + 'static {
    /// Get the name of this backend
    fn backend_name(&self) -> &'static str;

    /// CPU level this backend requires
    fn level(&self) -> CpuFeatureLevel;

    /// Get the SIMD width (number of elements processed in parallel)
    fn simd_width(&self) -> usize {
        1
    }

    /// Sum all elements in a slice
    fn sum(&self, data: &[T]) -> f64 {
        data.iter().fold(0.0, |acc, &x| acc + x.widen())
    }

    /// Compute dot product of two vectors
    fn dot_product(&self, a: &[T], b: &[T]) -> f64 {
        a.iter()
            .zip(b.iter())
            .fold(0.0, |acc, (&x, &y)| acc + x.widen() * y.widen())
    }

    /// y += alpha * x
    fn axpy(&self, alpha: T, x: &[T], y: &mut [T]) {
        for (yi, &xi) in y.iter_mut().zip(x.iter()) {
            *yi = *yi + alpha * xi;
        }
    }

    /// Compute mean of a slice
    fn mean(&self, data: &[T]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        self.sum(data) / data.len() as f64
    }
}

/// Backend a registered kernel is instantiated with
///
/// Kernels read elements of type `T` but factorize and solve in the `f64`
/// aggregate type, so they need primitives for both. Factories build the
/// backend through `Default`.
pub trait KernelBackend<T: Numeric>: ComputePrimitives<T> + ComputePrimitives<f64> + Default {}

impl<T, P> KernelBackend<T> for P
where
    T: Numeric,
    P: ComputePrimitives<T> + ComputePrimitives<f64> + Default,
{
}
