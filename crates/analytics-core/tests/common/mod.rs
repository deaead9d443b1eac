//! Shared utilities for integration tests
//!
//! Defines `ColumnMean`, a small algorithm used to exercise dispatch and the
//! containers without any real linear algebra.

#![allow(dead_code)]

use analytics_core::{
    register_levels, Algorithm, BatchKernel, ComputePrimitives, CpuFeatureLevel, DenseTable,
    DistributedKernel, Error, Kernel, KernelTable, Numeric, NumericTable, OnlineKernel,
    PartialResult, Result, ScalarBackend,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

pub use approx::assert_relative_eq;

pub const EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeanMethod {
    /// Registered at every compiled level
    Plain,
    /// Registered at baseline only
    BaselineOnly,
    /// Registered at SSE4.2 only
    Sse42Only,
    /// Never registered
    Missing,
}

impl fmt::Display for MeanMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MeanMethod::Plain => "plain",
            MeanMethod::BaselineOnly => "baseline_only",
            MeanMethod::Sse42Only => "sse42_only",
            MeanMethod::Missing => "missing",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeanParameter {
    /// Reject inputs containing negative values
    pub reject_negative: bool,
    /// Fail to finalize with fewer rows than this
    pub min_rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanPartial {
    pub n: usize,
    pub sums: Vec<f64>,
}

impl PartialResult for MeanPartial {
    fn is_empty(&self) -> bool {
        self.n == 0
    }
}

impl MeanPartial {
    fn merge(&mut self, other: &MeanPartial) -> Result<()> {
        if other.n == 0 {
            return Ok(());
        }
        if self.n == 0 {
            *self = other.clone();
            return Ok(());
        }
        if self.sums.len() != other.sums.len() {
            return Err(Error::size_mismatch(self.sums.len(), other.sums.len(), "column count"));
        }
        self.n += other.n;
        for (a, b) in self.sums.iter_mut().zip(&other.sums) {
            *a += b;
        }
        Ok(())
    }
}

/// Column means of a table
pub struct ColumnMean<T>(PhantomData<T>);

impl<T: Numeric> Algorithm for ColumnMean<T> {
    type Fp = T;
    type Method = MeanMethod;
    type Parameter = MeanParameter;
    type Input<'a> = &'a dyn NumericTable<T>;
    type PartialResult = MeanPartial;
    type Model = Vec<T>;

    const NAME: &'static str = "column_mean";

    fn kernel_table() -> &'static KernelTable<MeanMethod> {
        &MEAN_TABLE
    }
}

pub struct MeanKernel<T, P> {
    primitives: P,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Numeric, P: ComputePrimitives<T>> MeanKernel<T, P> {
    fn block(&self, table: &dyn NumericTable<T>, parameter: &MeanParameter) -> Result<MeanPartial> {
        if table.is_empty() {
            return Err(Error::empty_input("data"));
        }
        let mut column = Vec::new();
        let mut sums = Vec::with_capacity(table.n_columns());
        for c in 0..table.n_columns() {
            table.read_column(c, 0..table.n_rows(), &mut column);
            if parameter.reject_negative && column.iter().any(|v| *v < T::zero()) {
                return Err(Error::Numeric(format!("negative value in column {c}")));
            }
            sums.push(self.primitives.sum(&column));
        }
        Ok(MeanPartial {
            n: table.n_rows(),
            sums,
        })
    }

    fn finish(&self, partial: &MeanPartial, parameter: &MeanParameter) -> Result<Vec<T>> {
        if partial.n < parameter.min_rows {
            return Err(Error::Numeric(format!(
                "{} rows, need {}",
                partial.n, parameter.min_rows
            )));
        }
        Ok(self.means(partial))
    }

    fn means(&self, partial: &MeanPartial) -> Vec<T> {
        partial
            .sums
            .iter()
            .map(|s| T::narrow(s / partial.n as f64))
            .collect()
    }
}

impl<T: Numeric, P: ComputePrimitives<T>> Kernel for MeanKernel<T, P> {
    fn backend(&self) -> &'static str {
        self.primitives.backend_name()
    }

    fn level(&self) -> CpuFeatureLevel {
        self.primitives.level()
    }
}

impl<T: Numeric, P: ComputePrimitives<T>> BatchKernel<ColumnMean<T>> for MeanKernel<T, P> {
    fn compute(&self, input: &&dyn NumericTable<T>, parameter: &MeanParameter) -> Result<Vec<T>> {
        let partial = self.block(*input, parameter)?;
        Ok(self.means(&partial))
    }
}

impl<T: Numeric, P: ComputePrimitives<T>> OnlineKernel<ColumnMean<T>> for MeanKernel<T, P> {
    fn compute(
        &self,
        input: &&dyn NumericTable<T>,
        partial: &mut MeanPartial,
        parameter: &MeanParameter,
    ) -> Result<()> {
        let block = self.block(*input, parameter)?;
        partial.merge(&block)
    }

    fn finalize(&self, partial: &MeanPartial, parameter: &MeanParameter) -> Result<Vec<T>> {
        self.finish(partial, parameter)
    }
}

impl<T: Numeric, P: ComputePrimitives<T>> DistributedKernel<ColumnMean<T>> for MeanKernel<T, P> {
    fn aggregate(
        &self,
        locals: &[&MeanPartial],
        partial: &mut MeanPartial,
        _parameter: &MeanParameter,
    ) -> Result<()> {
        let mut merged = partial.clone();
        for local in locals {
            merged.merge(local)?;
        }
        *partial = merged;
        Ok(())
    }

    fn finalize(&self, partial: &MeanPartial, parameter: &MeanParameter) -> Result<Vec<T>> {
        self.finish(partial, parameter)
    }
}

fn mean_batch<T: Numeric, P: ComputePrimitives<T> + Default>() -> std::sync::Arc<dyn BatchKernel<ColumnMean<T>>> {
    std::sync::Arc::new(MeanKernel::<T, P> {
        primitives: P::default(),
        _marker: PhantomData,
    })
}

fn mean_online<T: Numeric, P: ComputePrimitives<T> + Default>() -> std::sync::Arc<dyn OnlineKernel<ColumnMean<T>>> {
    std::sync::Arc::new(MeanKernel::<T, P> {
        primitives: P::default(),
        _marker: PhantomData,
    })
}

fn mean_distributed<T: Numeric, P: ComputePrimitives<T> + Default>(
) -> std::sync::Arc<dyn DistributedKernel<ColumnMean<T>>> {
    std::sync::Arc::new(MeanKernel::<T, P> {
        primitives: P::default(),
        _marker: PhantomData,
    })
}

fn build_table() -> KernelTable<MeanMethod> {
    let mut table = KernelTable::new("column_mean");

    register_levels!(table, dyn BatchKernel<ColumnMean<f64>>, MeanMethod::Plain, mean_batch, f64);
    register_levels!(table, dyn BatchKernel<ColumnMean<f32>>, MeanMethod::Plain, mean_batch, f32);
    register_levels!(table, dyn OnlineKernel<ColumnMean<f64>>, MeanMethod::Plain, mean_online, f64);
    register_levels!(table, dyn OnlineKernel<ColumnMean<f32>>, MeanMethod::Plain, mean_online, f32);
    register_levels!(
        table,
        dyn DistributedKernel<ColumnMean<f64>>,
        MeanMethod::Plain,
        mean_distributed,
        f64
    );

    table.register::<dyn BatchKernel<ColumnMean<f64>>>(
        MeanMethod::BaselineOnly,
        CpuFeatureLevel::Baseline,
        mean_batch::<f64, ScalarBackend>,
    );
    table.register::<dyn BatchKernel<ColumnMean<f64>>>(
        MeanMethod::Sse42Only,
        CpuFeatureLevel::Sse42,
        mean_batch::<f64, ScalarBackend>,
    );
    table
}

lazy_static! {
    pub static ref MEAN_TABLE: KernelTable<MeanMethod> = build_table();
}

/// `n_rows` x 2 table with columns `i` and `2i + 1`
pub fn ramp_table(n_rows: usize, offset: usize) -> DenseTable<f64> {
    DenseTable::from_fn(n_rows, 2, |r, c| {
        let x = (r + offset) as f64;
        if c == 0 {
            x
        } else {
            2.0 * x + 1.0
        }
    })
}

/// Assert two vectors are equal within tolerance
pub fn assert_vectors_close(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, epsilon = epsilon, max_relative = epsilon);
    }
}
