//! Normal equations training
//!
//! Accumulates X'X and X'Y block by block and solves
//! `(X'X + lambda * I) beta = X'Y` per response with a Cholesky
//! factorization. The intercept is never penalized.

use super::{assemble_model, check_finite, gather_columns, shape_of, RANK_TOLERANCE};
use crate::input::TrainingInput;
use crate::model::RegressionModel;
use crate::parameter::RegressionParameter;
use crate::partial::{CrossProducts, PartialShape, RegressionPartial};
use analytics_core::{
    BlockExecutor, ComputePrimitives, CpuFeatureLevel, Error, Kernel, KernelBackend, Numeric,
    Result,
};
use nalgebra::{DMatrix, DVector};
use std::marker::PhantomData;
use std::ops::Range;
use tracing::trace;

/// Cross-product kernel for linear and ridge regression
pub struct NormalEquationsKernel<T, P> {
    primitives: P,
    executor: BlockExecutor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Numeric, P: KernelBackend<T>> NormalEquationsKernel<T, P> {
    pub fn new(primitives: P) -> Self {
        Self {
            primitives,
            executor: BlockExecutor::default(),
            _marker: PhantomData,
        }
    }

    /// Use a custom block size for the row split
    pub fn with_executor(mut self, executor: BlockExecutor) -> Self {
        self.executor = executor;
        self
    }

    fn block_products(
        &self,
        input: &TrainingInput<'_, T>,
        rows: Range<usize>,
        shape: PartialShape,
    ) -> Result<CrossProducts> {
        let dim = shape.dim();
        let k = shape.n_responses;
        let xs = gather_columns(input.data, rows.clone(), shape.intercept);
        let ys = gather_columns(input.responses, rows.clone(), false);

        let mut out = CrossProducts::zeros(shape);
        out.n_rows = rows.len();
        for i in 0..dim {
            for j in i..dim {
                let v = ComputePrimitives::<T>::dot_product(&self.primitives, &xs[i], &xs[j]);
                out.xtx[i * dim + j] = v;
                out.xtx[j * dim + i] = v;
            }
            for (r, y) in ys.iter().enumerate() {
                out.xty[i * k + r] = ComputePrimitives::<T>::dot_product(&self.primitives, &xs[i], y);
            }
        }
        check_finite(&out.xtx, "cross-product matrix")?;
        check_finite(&out.xty, "cross-product vector")?;
        Ok(out)
    }

    /// Cross-products of a whole input
    pub fn cross_products<Par: RegressionParameter>(
        &self,
        input: &TrainingInput<'_, T>,
        parameter: &Par,
    ) -> Result<CrossProducts> {
        input.validate()?;
        parameter.validate(input.n_responses())?;
        let shape = shape_of(input, parameter);
        let merged = self.executor.map_reduce(
            input.n_rows(),
            |rows| self.block_products(input, rows, shape),
            |mut a, b| {
                a.add(&b);
                a
            },
        )?;
        merged.ok_or_else(|| Error::empty_input("data"))
    }

    pub fn train<Par: RegressionParameter>(
        &self,
        input: &TrainingInput<'_, T>,
        parameter: &Par,
    ) -> Result<RegressionModel<T>> {
        let products = self.cross_products(input, parameter)?;
        self.solve(&products, parameter)
    }

    pub fn update<Par: RegressionParameter>(
        &self,
        input: &TrainingInput<'_, T>,
        partial: &mut RegressionPartial,
        parameter: &Par,
    ) -> Result<()> {
        let block = self.cross_products(input, parameter)?;
        match partial {
            RegressionPartial::Empty => *partial = RegressionPartial::NormalEquations(block),
            RegressionPartial::NormalEquations(acc) => acc.merge(&block)?,
            RegressionPartial::Qr(_) => return Err(Error::foreign_partial("normal equations")),
        }
        trace!(rows = partial.n_rows(), "accumulated cross-products");
        Ok(())
    }

    pub fn merge_all(&self, locals: &[&RegressionPartial], partial: &mut RegressionPartial) -> Result<()> {
        let mut acc = partial.clone();
        for local in locals {
            match local {
                RegressionPartial::Empty => {}
                RegressionPartial::NormalEquations(cp) => match &mut acc {
                    RegressionPartial::NormalEquations(a) => a.merge(cp)?,
                    RegressionPartial::Empty => {
                        cp.check_layout()?;
                        acc = RegressionPartial::NormalEquations(cp.clone());
                    }
                    RegressionPartial::Qr(_) => return Err(Error::foreign_partial("normal equations")),
                },
                RegressionPartial::Qr(_) => return Err(Error::foreign_partial("normal equations")),
            }
        }
        *partial = acc;
        Ok(())
    }

    pub fn finalize<Par: RegressionParameter>(
        &self,
        partial: &RegressionPartial,
        parameter: &Par,
    ) -> Result<RegressionModel<T>> {
        match partial {
            RegressionPartial::NormalEquations(cp) if cp.n_rows > 0 => self.solve(cp, parameter),
            RegressionPartial::Qr(_) => Err(Error::foreign_partial("normal equations")),
            _ => Err(Error::EmptyPartialResult),
        }
    }

    fn solve<Par: RegressionParameter>(
        &self,
        products: &CrossProducts,
        parameter: &Par,
    ) -> Result<RegressionModel<T>> {
        let shape = products.shape;
        parameter.validate(shape.n_responses)?;
        products.check_layout()?;
        let dim = shape.dim();
        let k = shape.n_responses;
        let first_penalized = usize::from(shape.intercept);
        let xtx = DMatrix::from_row_slice(dim, dim, &products.xtx);

        let mut solutions = Vec::with_capacity(dim * k);
        for r in 0..k {
            let lambda = parameter.penalty(r);
            let mut a = xtx.clone();
            for i in first_penalized..dim {
                a[(i, i)] += lambda;
            }
            let b = DVector::from_iterator(dim, (0..dim).map(|i| products.xty[i * k + r]));
            // squared pivots, so the bound is squared too
            let tolerance = a.diagonal().iter().fold(0.0f64, |m, v| m.max(v.abs()))
                * RANK_TOLERANCE
                * RANK_TOLERANCE;
            let cholesky = a
                .cholesky()
                .ok_or_else(|| Error::singular("cross-product matrix"))?;
            if cholesky.l_dirty().diagonal().iter().any(|d| d * d <= tolerance) {
                return Err(Error::singular("cross-product matrix"));
            }
            let beta = cholesky.solve(&b);
            check_finite(beta.as_slice(), "coefficients")?;
            solutions.extend(beta.iter().copied());
        }
        Ok(assemble_model(&shape, &solutions))
    }
}

impl<T: Numeric, P: KernelBackend<T>> Kernel for NormalEquationsKernel<T, P> {
    fn backend(&self) -> &'static str {
        ComputePrimitives::<T>::backend_name(&self.primitives)
    }

    fn level(&self) -> CpuFeatureLevel {
        ComputePrimitives::<T>::level(&self.primitives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{RidgeParameter, TrainingParameter};
    use analytics_core::{DenseTable, ScalarBackend};
    use approx::assert_relative_eq;

    fn line(n: usize) -> (DenseTable<f64>, DenseTable<f64>) {
        let x = DenseTable::from_fn(n, 1, |r, _| r as f64);
        let y = DenseTable::from_fn(n, 1, |r, _| 2.0 * r as f64 + 1.0);
        (x, y)
    }

    #[test]
    fn test_small_blocks_match_single_block() {
        let (x, y) = line(37);
        let input = TrainingInput::new(&x, &y);
        let par = TrainingParameter::default();
        let whole = NormalEquationsKernel::<f64, _>::new(ScalarBackend)
            .cross_products(&input, &par)
            .unwrap();
        let split = NormalEquationsKernel::<f64, _>::new(ScalarBackend)
            .with_executor(BlockExecutor::new(5))
            .cross_products(&input, &par)
            .unwrap();
        assert_eq!(whole.n_rows, 37);
        for (a, b) in whole.xtx.iter().zip(&split.xtx) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_solve_recovers_line() {
        let (x, y) = line(10);
        let kernel = NormalEquationsKernel::<f64, _>::new(ScalarBackend);
        let model = kernel
            .train(&TrainingInput::new(&x, &y), &TrainingParameter::default())
            .unwrap();
        assert_relative_eq!(model.intercept(0), 1.0, epsilon = 1e-9);
        assert_relative_eq!(model.coefficients(0)[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_singular_system() {
        let x = DenseTable::from_fn(4, 2, |r, _| r as f64);
        let (_, y) = line(4);
        let kernel = NormalEquationsKernel::<f64, _>::new(ScalarBackend);
        let err = kernel
            .train(&TrainingInput::new(&x, &y), &TrainingParameter::without_intercept())
            .unwrap_err();
        assert!(matches!(err, Error::Numeric(_)));

        // a ridge penalty makes the same system solvable
        let par = RidgeParameter::new(0.5).with_intercept(false);
        assert!(kernel.train(&TrainingInput::new(&x, &y), &par).is_ok());
    }

    #[test]
    fn test_update_rejects_foreign_partial() {
        let (x, y) = line(4);
        let kernel = NormalEquationsKernel::<f64, _>::new(ScalarBackend);
        let mut partial = RegressionPartial::Qr(crate::partial::QrFactors {
            shape: PartialShape {
                n_features: 1,
                n_responses: 1,
                intercept: true,
            },
            n_rows: 0,
            r: vec![0.0; 4],
            qty: vec![0.0; 2],
        });
        let before = partial.clone();
        assert!(kernel
            .update(&TrainingInput::new(&x, &y), &mut partial, &TrainingParameter::default())
            .is_err());
        assert_eq!(partial, before);
    }
}
