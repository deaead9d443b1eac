//! PCA algorithm descriptor and kernel table

use crate::kernel::CorrelationKernel;
use crate::model::PcaModel;
use crate::parameter::PcaParameter;
use crate::partial::PcaPartial;
use analytics_core::{
    register_levels, Algorithm, BatchKernel, DistributedKernel, KernelBackend, KernelTable,
    Numeric, NumericTable, OnlineKernel, Result,
};
use lazy_static::lazy_static;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// PCA method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PcaMethod {
    /// Eigen-decomposition of the correlation matrix
    #[default]
    Correlation,
}

impl fmt::Display for PcaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("correlation")
    }
}

/// Principal component analysis
pub struct Pca<T>(PhantomData<T>);

impl<T: Numeric> Algorithm for Pca<T> {
    type Fp = T;
    type Method = PcaMethod;
    type Parameter = PcaParameter;
    type Input<'a> = &'a dyn NumericTable<T>;
    type PartialResult = PcaPartial;
    type Model = PcaModel<T>;

    const NAME: &'static str = "pca";

    fn kernel_table() -> &'static KernelTable<PcaMethod> {
        &PCA_TABLE
    }
}

impl<T: Numeric, P: KernelBackend<T>> BatchKernel<Pca<T>> for CorrelationKernel<T, P> {
    fn compute(&self, input: &&dyn NumericTable<T>, parameter: &PcaParameter) -> Result<PcaModel<T>> {
        let moments = self.moments(*input)?;
        CorrelationKernel::finalize(self, &moments, parameter)
    }
}

impl<T: Numeric, P: KernelBackend<T>> OnlineKernel<Pca<T>> for CorrelationKernel<T, P> {
    fn compute(
        &self,
        input: &&dyn NumericTable<T>,
        partial: &mut PcaPartial,
        _parameter: &PcaParameter,
    ) -> Result<()> {
        self.update(*input, partial)
    }

    fn finalize(&self, partial: &PcaPartial, parameter: &PcaParameter) -> Result<PcaModel<T>> {
        CorrelationKernel::finalize(self, partial, parameter)
    }
}

impl<T: Numeric, P: KernelBackend<T>> DistributedKernel<Pca<T>> for CorrelationKernel<T, P> {
    fn aggregate(
        &self,
        locals: &[&PcaPartial],
        partial: &mut PcaPartial,
        _parameter: &PcaParameter,
    ) -> Result<()> {
        self.merge_all(locals, partial)
    }

    fn finalize(&self, partial: &PcaPartial, parameter: &PcaParameter) -> Result<PcaModel<T>> {
        CorrelationKernel::finalize(self, partial, parameter)
    }
}

fn correlation_batch<T: Numeric, P: KernelBackend<T>>() -> Arc<dyn BatchKernel<Pca<T>>> {
    Arc::new(CorrelationKernel::<T, P>::new(P::default()))
}

fn correlation_online<T: Numeric, P: KernelBackend<T>>() -> Arc<dyn OnlineKernel<Pca<T>>> {
    Arc::new(CorrelationKernel::<T, P>::new(P::default()))
}

fn correlation_distributed<T: Numeric, P: KernelBackend<T>>() -> Arc<dyn DistributedKernel<Pca<T>>> {
    Arc::new(CorrelationKernel::<T, P>::new(P::default()))
}

lazy_static! {
    static ref PCA_TABLE: KernelTable<PcaMethod> = {
        let mut table = KernelTable::new("pca");
        register_levels!(table, dyn BatchKernel<Pca<f32>>, PcaMethod::Correlation, correlation_batch, f32);
        register_levels!(table, dyn BatchKernel<Pca<f64>>, PcaMethod::Correlation, correlation_batch, f64);
        register_levels!(table, dyn OnlineKernel<Pca<f32>>, PcaMethod::Correlation, correlation_online, f32);
        register_levels!(table, dyn OnlineKernel<Pca<f64>>, PcaMethod::Correlation, correlation_online, f64);
        register_levels!(
            table,
            dyn DistributedKernel<Pca<f32>>,
            PcaMethod::Correlation,
            correlation_distributed,
            f32
        );
        register_levels!(
            table,
            dyn DistributedKernel<Pca<f64>>,
            PcaMethod::Correlation,
            correlation_distributed,
            f64
        );
        table
    };
}
