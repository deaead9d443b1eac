//! Kernel selection
//!
//! The dispatcher resolves a (precision, method, mode) request against a
//! kernel table, walking down from the environment's CPU level and binding
//! the first implementation it finds. Containers bind once, at construction.

use crate::algorithm::KernelMethod;
use crate::config::Environment;
use crate::cpu::CpuFeatureLevel;
use crate::error::{Error, Result};
use crate::kernels::KernelInterface;
use crate::registry::KernelTable;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, trace};

/// A kernel selected for a container, with the level it was found at
pub struct BoundKernel<K: ?Sized> {
    kernel: Arc<K>,
    level: CpuFeatureLevel,
}

impl<K: ?Sized> BoundKernel<K> {
    /// CPU level of the table entry that was bound
    pub fn level(&self) -> CpuFeatureLevel {
        self.level
    }

    /// Shared handle to the kernel
    pub fn shared(&self) -> Arc<K> {
        Arc::clone(&self.kernel)
    }

    /// True when both handles point at the same kernel instance
    pub fn same_as(&self, other: &BoundKernel<K>) -> bool {
        Arc::ptr_eq(&self.kernel, &other.kernel)
    }
}

impl<K: ?Sized> Clone for BoundKernel<K> {
    fn clone(&self) -> Self {
        Self {
            kernel: Arc::clone(&self.kernel),
            level: self.level,
        }
    }
}

impl<K: ?Sized> Deref for BoundKernel<K> {
    type Target = K;

    fn deref(&self) -> &K {
        &self.kernel
    }
}

impl<K: KernelInterface + ?Sized> fmt::Debug for BoundKernel<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundKernel")
            .field("name", &self.kernel.name())
            .field("backend", &self.kernel.backend())
            .field("level", &self.level)
            .finish()
    }
}

/// Ranked lookup over a kernel table
pub struct Dispatcher<'t, M> {
    table: &'t KernelTable<M>,
    ceiling: CpuFeatureLevel,
}

impl<'t, M: KernelMethod> Dispatcher<'t, M> {
    pub fn new(table: &'t KernelTable<M>, env: &Environment) -> Self {
        Self {
            table,
            ceiling: env.cpu(),
        }
    }

    /// Highest level the dispatcher considers
    pub fn ceiling(&self) -> CpuFeatureLevel {
        self.ceiling
    }

    /// Bind the best `K` kernel for `method` at or below the ceiling
    pub fn bind<K>(&self, method: M) -> Result<BoundKernel<K>>
    where
        K: KernelInterface + ?Sized,
    {
        for level in self.ceiling.descending() {
            if let Some(kernel) = self.table.lookup::<K>(method, level) {
                debug!(
                    family = self.table.family(),
                    precision = %K::PRECISION,
                    mode = %K::MODE,
                    %method,
                    %level,
                    backend = kernel.backend(),
                    "bound kernel"
                );
                return Ok(BoundKernel { kernel, level });
            }
            trace!(family = self.table.family(), %method, %level, "no kernel at level");
        }

        Err(Error::KernelNotAvailable {
            precision: K::PRECISION,
            method: method.to_string(),
            mode: K::MODE,
            level: self.ceiling,
        })
    }
}
