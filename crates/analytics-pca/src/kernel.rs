//! Correlation-method kernel

use crate::model::PcaModel;
use crate::parameter::PcaParameter;
use crate::partial::PcaPartial;
use analytics_core::{
    BlockExecutor, ComputePrimitives, CpuFeatureLevel, Error, Kernel, KernelBackend, Numeric,
    NumericTable, Result,
};
use nalgebra::{DMatrix, SymmetricEigen};
use ordered_float::OrderedFloat;
use std::marker::PhantomData;
use std::ops::Range;
use tracing::trace;

pub struct CorrelationKernel<T, P> {
    primitives: P,
    executor: BlockExecutor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Numeric, P: KernelBackend<T>> CorrelationKernel<T, P> {
    pub fn new(primitives: P) -> Self {
        Self {
            primitives,
            executor: BlockExecutor::default(),
            _marker: PhantomData,
        }
    }

    pub fn with_executor(mut self, executor: BlockExecutor) -> Self {
        self.executor = executor;
        self
    }

    fn block_moments(&self, data: &dyn NumericTable<T>, rows: Range<usize>) -> Result<PcaPartial> {
        let p = data.n_columns();
        let mut column = Vec::with_capacity(rows.len());
        let mut centered = Vec::with_capacity(p);
        let mut means = Vec::with_capacity(p);
        for c in 0..p {
            data.read_column(c, rows.clone(), &mut column);
            let mean = ComputePrimitives::<T>::mean(&self.primitives, &column);
            if !mean.is_finite() {
                return Err(Error::non_finite("data"));
            }
            centered.push(column.iter().map(|v| v.widen() - mean).collect::<Vec<f64>>());
            means.push(mean);
        }

        let mut cross = vec![0.0; p * p];
        for i in 0..p {
            for j in i..p {
                let v = ComputePrimitives::<f64>::dot_product(&self.primitives, &centered[i], &centered[j]);
                cross[i * p + j] = v;
                cross[j * p + i] = v;
            }
        }
        Ok(PcaPartial {
            n: rows.len(),
            means,
            cross,
        })
    }

    /// Moments of a whole table
    pub fn moments(&self, data: &dyn NumericTable<T>) -> Result<PcaPartial> {
        if data.n_rows() == 0 {
            return Err(Error::empty_input("data"));
        }
        if data.n_columns() == 0 {
            return Err(Error::InvalidParameter("data table has no columns".into()));
        }
        let merged = self.executor.try_map_reduce(
            data.n_rows(),
            |rows| self.block_moments(data, rows),
            |a, b| a.merged(&b),
        )?;
        merged.ok_or_else(|| Error::empty_input("data"))
    }

    pub fn update(&self, data: &dyn NumericTable<T>, partial: &mut PcaPartial) -> Result<()> {
        let block = self.moments(data)?;
        *partial = partial.merged(&block)?;
        trace!(n = partial.n, "accumulated moments");
        Ok(())
    }

    pub fn merge_all(&self, locals: &[&PcaPartial], partial: &mut PcaPartial) -> Result<()> {
        let mut acc = partial.clone();
        for local in locals {
            acc = acc.merged(local)?;
        }
        *partial = acc;
        Ok(())
    }

    pub fn finalize(&self, partial: &PcaPartial, parameter: &PcaParameter) -> Result<PcaModel<T>> {
        if partial.n == 0 {
            return Err(Error::EmptyPartialResult);
        }
        partial.check_layout()?;
        let p = partial.n_features();
        let k = parameter.components(p)?;
        if partial.n < 2 {
            return Err(Error::Numeric(
                "correlation needs at least two observations".into(),
            ));
        }

        let denom = (partial.n - 1) as f64;
        let variances: Vec<f64> = (0..p).map(|i| partial.cross[i * p + i] / denom).collect();
        for (i, v) in variances.iter().enumerate() {
            // moments are centered, so only rounding of the values themselves remains
            let floor = f64::EPSILON * partial.means[i].abs().max(1.0);
            if v.is_nan() || *v <= floor * floor {
                return Err(Error::Numeric(format!("column {i} has zero variance")));
            }
        }

        let correlation = DMatrix::from_fn(p, p, |i, j| {
            partial.cross[i * p + j] / (partial.cross[i * p + i] * partial.cross[j * p + j]).sqrt()
        });
        let eigen = SymmetricEigen::new(correlation);

        let mut order: Vec<usize> = (0..p).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(OrderedFloat(eigen.eigenvalues[i])));

        let mut eigenvalues = Vec::with_capacity(k);
        let mut eigenvectors = Vec::with_capacity(k * p);
        for &i in order.iter().take(k) {
            eigenvalues.push(T::narrow(eigen.eigenvalues[i].max(0.0)));
            let column = eigen.eigenvectors.column(i);
            let pivot = column.iter().fold(0.0f64, |m, v| if v.abs() > m.abs() { *v } else { m });
            let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
            eigenvectors.extend(column.iter().map(|v| T::narrow(sign * v)));
        }

        Ok(PcaModel::new(
            p,
            eigenvalues,
            eigenvectors,
            partial.means.iter().map(|&v| T::narrow(v)).collect(),
            variances.into_iter().map(T::narrow).collect(),
        ))
    }
}

impl<T: Numeric, P: KernelBackend<T>> Kernel for CorrelationKernel<T, P> {
    fn backend(&self) -> &'static str {
        ComputePrimitives::<T>::backend_name(&self.primitives)
    }

    fn level(&self) -> CpuFeatureLevel {
        ComputePrimitives::<T>::level(&self.primitives)
    }
}
