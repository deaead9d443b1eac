//! Scalar backend implementation
//!
//! Portable code for every CPU; this is what baseline kernels run on.

use crate::cpu::CpuFeatureLevel;
use crate::primitives::ComputePrimitives;
use crate::Numeric;

/// Scalar backend - works for all numeric types
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarBackend;

impl ScalarBackend {
    pub fn new() -> Self {
        Self
    }
}

// All operations use the default implementations from the trait
impl<T: Numeric> ComputePrimitives<T> for ScalarBackend {
    fn backend_name(&self) -> &'static str {
        "scalar"
    }

    fn level(&self) -> CpuFeatureLevel {
        CpuFeatureLevel::Baseline
    }
}
