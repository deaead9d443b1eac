//! Prediction with a trained regression model
//!
//! Batch only. The output is a column-major `n_rows x n_responses` table.

use crate::factories::PREDICTION_TABLE;
use crate::model::RegressionModel;
use analytics_core::{
    Algorithm, BatchKernel, ComputePrimitives, CpuFeatureLevel, DenseTable, Error, Kernel,
    KernelBackend, KernelTable, NoPartialResult, Numeric, NumericTable, Result,
};
use std::fmt;
use std::marker::PhantomData;

/// Prediction method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PredictionMethod {
    #[default]
    Default,
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("default")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictionParameter;

/// Data to score and the model to score it with
#[derive(Clone, Copy)]
pub struct PredictionInput<'a, T: Numeric> {
    pub data: &'a dyn NumericTable<T>,
    pub model: &'a RegressionModel<T>,
}

impl<'a, T: Numeric> PredictionInput<'a, T> {
    pub fn new(data: &'a dyn NumericTable<T>, model: &'a RegressionModel<T>) -> Self {
        Self { data, model }
    }

    fn validate(&self) -> Result<()> {
        if self.data.n_rows() == 0 {
            return Err(Error::empty_input("data"));
        }
        if self.data.n_columns() != self.model.n_features() {
            return Err(Error::size_mismatch(
                self.model.n_features(),
                self.data.n_columns(),
                "feature count of prediction data",
            ));
        }
        Ok(())
    }
}

/// Linear model evaluation
pub struct RegressionPrediction<T>(PhantomData<T>);

impl<T: Numeric> Algorithm for RegressionPrediction<T> {
    type Fp = T;
    type Method = PredictionMethod;
    type Parameter = PredictionParameter;
    type Input<'a> = PredictionInput<'a, T>;
    type PartialResult = NoPartialResult;
    type Model = DenseTable<T>;

    const NAME: &'static str = "regression_prediction";

    fn kernel_table() -> &'static KernelTable<PredictionMethod> {
        &PREDICTION_TABLE
    }
}

pub struct PredictionKernel<T, P> {
    primitives: P,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Numeric, P: KernelBackend<T>> PredictionKernel<T, P> {
    pub fn new(primitives: P) -> Self {
        Self {
            primitives,
            _marker: PhantomData,
        }
    }

    pub fn predict(&self, input: &PredictionInput<'_, T>) -> Result<DenseTable<T>> {
        input.validate()?;
        let n = input.data.n_rows();
        let model = input.model;

        let mut out = vec![T::zero(); n * model.n_responses()];
        let mut column = Vec::with_capacity(n);
        for (r, slot) in out.chunks_mut(n).enumerate() {
            slot.fill(model.intercept(r));
            for (j, &b) in model.coefficients(r).iter().enumerate() {
                input.data.read_column(j, 0..n, &mut column);
                ComputePrimitives::<T>::axpy(&self.primitives, b, &column, slot);
            }
        }
        DenseTable::from_columns(n, out)
    }
}

impl<T: Numeric, P: KernelBackend<T>> Kernel for PredictionKernel<T, P> {
    fn backend(&self) -> &'static str {
        ComputePrimitives::<T>::backend_name(&self.primitives)
    }

    fn level(&self) -> CpuFeatureLevel {
        ComputePrimitives::<T>::level(&self.primitives)
    }
}

impl<T: Numeric, P: KernelBackend<T>> BatchKernel<RegressionPrediction<T>> for PredictionKernel<T, P> {
    fn compute(
        &self,
        input: &PredictionInput<'_, T>,
        _parameter: &PredictionParameter,
    ) -> Result<DenseTable<T>> {
        self.predict(input)
    }
}
