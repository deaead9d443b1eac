//! Algorithm descriptors
//!
//! An [`Algorithm`] is a zero-sized type that ties together everything a
//! container needs to know about one algorithm family at one precision: its
//! method enum, parameter, input, partial result and model types, and the
//! kernel table its kernels are registered in.

use crate::error::Result;
use crate::numeric::Numeric;
use crate::registry::KernelTable;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Execution topology of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComputeMode {
    /// Whole dataset in one call
    Batch,
    /// Data arrives in blocks folded into a partial result
    Online,
    /// Master step merging partial results produced by workers
    Distributed,
}

impl ComputeMode {
    pub fn name(&self) -> &'static str {
        match self {
            ComputeMode::Batch => "batch",
            ComputeMode::Online => "online",
            ComputeMode::Distributed => "distributed",
        }
    }
}

impl fmt::Display for ComputeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Method selector of an algorithm family
pub trait KernelMethod: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {}

impl<M> KernelMethod for M where M: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {}

/// Accumulated state of an online or distributed computation
///
/// The default value is the empty state a fresh container starts from.
pub trait PartialResult: Default + Clone + Debug + Send + Sync {
    /// True when nothing has been accumulated
    fn is_empty(&self) -> bool;

    /// Return to the empty state
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check internal buffers against the declared shape
    ///
    /// Partial results can arrive from outside the process, so containers
    /// call this before accepting one.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Partial result of algorithms that only run in batch mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoPartialResult;

impl PartialResult for NoPartialResult {
    fn is_empty(&self) -> bool {
        true
    }
}

/// Type-level description of an algorithm at a fixed precision
pub trait Algorithm: Send + Sync + 'static {
    /// Element type; determines the precision component of the kernel key
    type Fp: Numeric;
    type Method: KernelMethod;
    type Parameter: Clone + Debug + Send + Sync;
    /// Borrowed input of one compute call
    type Input<'a>;
    type PartialResult: PartialResult;
    type Model: Clone + Debug + Send + Sync;

    /// Family name used in logs
    const NAME: &'static str;

    /// Kernel table shared by every precision of this family
    fn kernel_table() -> &'static KernelTable<Self::Method>;
}
