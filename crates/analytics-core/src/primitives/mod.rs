//! Computational primitives with compile-time dispatch
//!
//! Kernels are generic over a [`ComputePrimitives`] backend. The kernel table
//! registers one instantiation per CPU level, e.g. a scalar one at
//! `Baseline` and an AVX2 one at `Avx2`, and the dispatcher picks between
//! them at run time.
//!
//! ```rust
//! use analytics_core::primitives::{ComputePrimitives, ScalarBackend};
//!
//! let backend = ScalarBackend::new();
//! let a = [1.0f64, 2.0, 3.0];
//! assert_eq!(backend.dot_product(&a, &a), 14.0);
//! ```

pub mod backends;
pub mod traits;

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub use backends::Avx2Backend;
pub use backends::ScalarBackend;
pub use traits::{ComputePrimitives, KernelBackend};

/// Name of the fastest backend usable on this machine
pub fn best_backend_name() -> &'static str {
    #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
    {
        if Avx2Backend::is_available() {
            return "avx2";
        }
    }
    "scalar"
}
