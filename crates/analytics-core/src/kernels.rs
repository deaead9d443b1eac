//! Kernel traits
//!
//! A kernel is a stateless numeric routine bound to one (precision, method,
//! CPU level) triple. Kernels are shared behind `Arc` and may be used by many
//! containers at once, so every entry point takes `&self`. Containers own all
//! mutable state and lend it to the kernel for the duration of a call.
//!
//! Kernels that fail must leave the partial result they were given
//! untouched.

use crate::algorithm::{Algorithm, ComputeMode};
use crate::cpu::CpuFeatureLevel;
use crate::error::Result;
use crate::numeric::{Numeric, Precision};

/// Common identity of all kernels
pub trait Kernel: Send + Sync {
    /// Name of this kernel for debugging/logging
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Name of the primitives backend the kernel runs on
    fn backend(&self) -> &'static str;

    /// CPU level the kernel requires
    fn level(&self) -> CpuFeatureLevel;
}

/// Single-shot computation over a full dataset
pub trait BatchKernel<A: Algorithm>: Kernel {
    fn compute(&self, input: &A::Input<'_>, parameter: &A::Parameter) -> Result<A::Model>;
}

/// Incremental computation over data blocks
pub trait OnlineKernel<A: Algorithm>: Kernel {
    /// Fold one block into `partial`
    fn compute(
        &self,
        input: &A::Input<'_>,
        partial: &mut A::PartialResult,
        parameter: &A::Parameter,
    ) -> Result<()>;

    /// Produce a model from `partial` without modifying it
    fn finalize(&self, partial: &A::PartialResult, parameter: &A::Parameter) -> Result<A::Model>;
}

/// Master-side merge of partial results produced by workers
pub trait DistributedKernel<A: Algorithm>: Kernel {
    /// Fold every local partial into `partial`
    fn aggregate(
        &self,
        locals: &[&A::PartialResult],
        partial: &mut A::PartialResult,
        parameter: &A::Parameter,
    ) -> Result<()>;

    fn finalize(&self, partial: &A::PartialResult, parameter: &A::Parameter) -> Result<A::Model>;
}

/// Key components carried by a kernel trait object type
///
/// Lets the kernel table and dispatcher derive the precision and mode of a
/// lookup from the requested trait object alone.
pub trait KernelInterface: Kernel + 'static {
    const MODE: ComputeMode;
    const PRECISION: Precision;
}

impl<A: Algorithm> KernelInterface for dyn BatchKernel<A> {
    const MODE: ComputeMode = ComputeMode::Batch;
    const PRECISION: Precision = <A::Fp as Numeric>::PRECISION;
}

impl<A: Algorithm> KernelInterface for dyn OnlineKernel<A> {
    const MODE: ComputeMode = ComputeMode::Online;
    const PRECISION: Precision = <A::Fp as Numeric>::PRECISION;
}

impl<A: Algorithm> KernelInterface for dyn DistributedKernel<A> {
    const MODE: ComputeMode = ComputeMode::Distributed;
    const PRECISION: Precision = <A::Fp as Numeric>::PRECISION;
}
