//! Kernel tables
//!
//! Each algorithm family owns one [`KernelTable`], built lazily on first use
//! and read-only afterwards. An entry maps a
//! (precision, method, mode, CPU level) key to a factory function producing the
//! kernel as a shared trait object.
//!
//! ```rust,ignore
//! lazy_static! {
//!     static ref TABLE: KernelTable<RegressionMethod> = {
//!         let mut table = KernelTable::new("linear_regression");
//!         table.register::<dyn BatchKernel<LinearRegression<f64>>>(
//!             RegressionMethod::Qr,
//!             CpuFeatureLevel::Baseline,
//!             qr_batch::<f64, ScalarBackend>,
//!         );
//!         table
//!     };
//! }
//! ```

use crate::algorithm::{ComputeMode, KernelMethod};
use crate::cpu::CpuFeatureLevel;
use crate::kernels::KernelInterface;
use crate::numeric::Precision;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Constructor of a shared kernel
pub type KernelFactory<K> = fn() -> Arc<K>;

/// Full key of a table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelKey<M> {
    pub precision: Precision,
    pub method: M,
    pub mode: ComputeMode,
    pub level: CpuFeatureLevel,
}

impl<M: fmt::Display> fmt::Display for KernelKey<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.precision, self.method, self.mode, self.level
        )
    }
}

/// Registry of kernel factories for one algorithm family
pub struct KernelTable<M> {
    family: &'static str,
    entries: HashMap<KernelKey<M>, Box<dyn Any + Send + Sync>>,
}

impl<M: KernelMethod> KernelTable<M> {
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            entries: HashMap::new(),
        }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Register `factory` as the `K` kernel for `method` at `level`
    ///
    /// Registering the same key twice replaces the earlier factory.
    pub fn register<K>(
        &mut self,
        method: M,
        level: CpuFeatureLevel,
        factory: KernelFactory<K>,
    ) -> &mut Self
    where
        K: KernelInterface + ?Sized,
    {
        let key = Self::key::<K>(method, level);
        trace!(family = self.family, %key, "registering kernel");
        self.entries.insert(key, Box::new(factory));
        self
    }

    /// Instantiate the `K` kernel registered for `method` at exactly `level`
    pub fn lookup<K>(&self, method: M, level: CpuFeatureLevel) -> Option<Arc<K>>
    where
        K: KernelInterface + ?Sized,
    {
        self.entries
            .get(&Self::key::<K>(method, level))
            .and_then(|entry| entry.downcast_ref::<KernelFactory<K>>())
            .map(|factory| factory())
    }

    /// Whether any entry exists for the key
    pub fn contains(
        &self,
        precision: Precision,
        method: M,
        mode: ComputeMode,
        level: CpuFeatureLevel,
    ) -> bool {
        self.entries.contains_key(&KernelKey {
            precision,
            method,
            mode,
            level,
        })
    }

    /// Levels with an implementation for the combination, lowest first
    pub fn levels(&self, precision: Precision, method: M, mode: ComputeMode) -> Vec<CpuFeatureLevel> {
        CpuFeatureLevel::ALL
            .into_iter()
            .filter(|&level| self.contains(precision, method, mode, level))
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &KernelKey<M>> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key<K: KernelInterface + ?Sized>(method: M, level: CpuFeatureLevel) -> KernelKey<M> {
        KernelKey {
            precision: K::PRECISION,
            method,
            mode: K::MODE,
            level,
        }
    }
}

impl<M: KernelMethod> fmt::Debug for KernelTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.entries.keys().map(|k| k.to_string()).collect();
        keys.sort();
        f.debug_struct("KernelTable")
            .field("family", &self.family)
            .field("entries", &keys)
            .finish()
    }
}
