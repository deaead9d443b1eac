//! Kernel dispatch and execution containers for analytics algorithms
//!
//! This crate provides the machinery every algorithm crate builds on.
//!
//! # Architecture Overview
//!
//! 1. **Primitives** - vector operations with scalar and AVX2 backends
//! 2. **Kernels** - per-algorithm numeric routines generic over a backend,
//!    registered in a [`KernelTable`] under (precision, method, mode, CPU level)
//! 3. **Containers** - batch, online and distributed drivers that bind the
//!    best kernel once via the [`Dispatcher`] and report through [`Status`]
//!
//! # Example
//!
//! ```rust
//! use analytics_core::{Environment, ErrorPolicy, CpuFeatureLevel};
//!
//! let env = Environment::detect()
//!     .with_cpu_limit(CpuFeatureLevel::Avx2)
//!     .with_error_policy(ErrorPolicy::Accumulate);
//! assert!(env.cpu() <= CpuFeatureLevel::Avx2);
//! ```

pub mod algorithm;
pub mod config;
pub mod container;
pub mod cpu;
pub mod dispatch;
pub mod error;
pub mod execution;
pub mod kernels;
pub mod numeric;
pub mod primitives;
pub mod registry;
pub mod status;
pub mod table;

pub use algorithm::{Algorithm, ComputeMode, KernelMethod, NoPartialResult, PartialResult};
pub use config::Environment;
pub use container::{
    BatchContainer, ContainerState, DistributedContainer, OnlineContainer, PartialModels,
};
pub use cpu::{CpuFeatureLevel, CpuFeatures};
pub use dispatch::{BoundKernel, Dispatcher};
pub use error::{DetailValue, Error, ErrorDetail, ErrorKind, Result};
pub use execution::{BlockExecutor, ExecutionStrategy};
pub use kernels::{BatchKernel, DistributedKernel, Kernel, KernelInterface, OnlineKernel};
pub use numeric::{Numeric, Precision};
pub use primitives::{best_backend_name, ComputePrimitives, KernelBackend, ScalarBackend};
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub use primitives::Avx2Backend;
pub use registry::{KernelFactory, KernelKey, KernelTable};
pub use status::{ErrorPolicy, Status};
pub use table::{DenseTable, Layout, NumericTable, TableView};

/// Register one kernel factory per CPU level compiled into this build
///
/// Expands to a scalar registration at `Baseline` and, when the calling
/// crate's `avx2` feature is enabled on x86_64, an AVX2 registration at
/// `Avx2`. Calling crates forward their `avx2` feature to this crate's. The factory
/// path must be generic over `<T, P>` with `T` the element type and `P` the
/// primitives backend.
///
/// ```rust,ignore
/// register_levels!(table, dyn BatchKernel<LinearRegression<f64>>, Method::Qr, qr_batch, f64);
/// ```
#[macro_export]
macro_rules! register_levels {
    ($table:expr, $iface:ty, $method:expr, $factory:ident, $fp:ty) => {{
        $table.register::<$iface>(
            $method,
            $crate::CpuFeatureLevel::Baseline,
            $factory::<$fp, $crate::ScalarBackend>,
        );
        #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
        {
            $table.register::<$iface>(
                $method,
                $crate::CpuFeatureLevel::Avx2,
                $factory::<$fp, $crate::Avx2Backend>,
            );
        }
    }};
}
