//! QR training
//!
//! Each block is reduced to the pair `(R, Q'Y)` of its design matrix. Two
//! pairs merge by factorizing the stacked `[R1; R2]` against `[Q'Y1; Q'Y2]`,
//! so the accumulated state stays `dim x dim` however many rows are folded in.
//! Coefficients come from back-substitution on the final `R`.

use super::{assemble_model, check_finite, gather_columns, shape_of, RANK_TOLERANCE};
use crate::input::TrainingInput;
use crate::model::RegressionModel;
use crate::parameter::RegressionParameter;
use crate::partial::{PartialShape, QrFactors, RegressionPartial};
use analytics_core::{
    BlockExecutor, ComputePrimitives, CpuFeatureLevel, Error, Kernel, KernelBackend, Numeric,
    Result,
};
use nalgebra::DMatrix;
use std::marker::PhantomData;
use std::ops::Range;
use tracing::trace;

/// Factorize `x` and rotate `y`, padding the result to `dim` rows
fn factor(x: DMatrix<f64>, y: DMatrix<f64>, shape: PartialShape, n_rows: usize) -> QrFactors {
    let dim = shape.dim();
    let k = shape.n_responses;
    let qr = x.qr();
    let qty = qr.q().transpose() * y;
    let r = qr.r();

    let mut out = QrFactors {
        shape,
        n_rows,
        r: vec![0.0; dim * dim],
        qty: vec![0.0; dim * k],
    };
    for i in 0..r.nrows().min(dim) {
        for j in i..dim {
            out.r[i * dim + j] = r[(i, j)];
        }
        for c in 0..k {
            out.qty[i * k + c] = qty[(i, c)];
        }
    }
    out
}

/// Stack two factor pairs and re-factorize
fn combine(a: &QrFactors, b: &QrFactors) -> QrFactors {
    let shape = a.shape;
    let dim = shape.dim();
    let k = shape.n_responses;
    let x = DMatrix::from_fn(2 * dim, dim, |i, j| {
        if i < dim {
            a.r[i * dim + j]
        } else {
            b.r[(i - dim) * dim + j]
        }
    });
    let y = DMatrix::from_fn(2 * dim, k, |i, j| {
        if i < dim {
            a.qty[i * k + j]
        } else {
            b.qty[(i - dim) * k + j]
        }
    });
    factor(x, y, shape, a.n_rows + b.n_rows)
}

fn merge_into(acc: &mut QrFactors, other: &QrFactors) -> Result<()> {
    acc.shape.check_compatible(&other.shape)?;
    acc.check_layout()?;
    other.check_layout()?;
    *acc = combine(acc, other);
    Ok(())
}

/// Householder QR kernel for linear regression
pub struct QrKernel<T, P> {
    primitives: P,
    executor: BlockExecutor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Numeric, P: KernelBackend<T>> QrKernel<T, P> {
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

    fn block_factors(
        &self,
        input: &TrainingInput<'_, T>,
        rows: Range<usize>,
        shape: PartialShape,
    ) -> Result<QrFactors> {
        let m = rows.len();
        let xs = gather_columns(input.data, rows.clone(), shape.intercept);
        let ys = gather_columns(input.responses, rows, false);
        let x = DMatrix::from_fn(m, shape.dim(), |i, j| xs[j][i].widen());
        let y = DMatrix::from_fn(m, shape.n_responses, |i, j| ys[j][i].widen());
        check_finite(x.as_slice(), "data")?;
        check_finite(y.as_slice(), "responses")?;
        Ok(factor(x, y, shape, m))
    }

    /// Factor pair of a whole input
    pub fn factors<Par: RegressionParameter>(
        &self,
        input: &TrainingInput<'_, T>,
        parameter: &Par,
    ) -> Result<QrFactors> {
        input.validate()?;
        parameter.validate(input.n_responses())?;
        let shape = shape_of(input, parameter);
        let merged = self.executor.map_reduce(
            input.n_rows(),
            |rows| self.block_factors(input, rows, shape),
            |a, b| combine(&a, &b),
        )?;
        merged.ok_or_else(|| Error::empty_input("data"))
    }

    pub fn train<Par: RegressionParameter>(
        &self,
        input: &TrainingInput<'_, T>,
        parameter: &Par,
    ) -> Result<RegressionModel<T>> {
        let factors = self.factors(input, parameter)?;
        self.solve(&factors)
    }

    pub fn update<Par: RegressionParameter>(
        &self,
        input: &TrainingInput<'_, T>,
        partial: &mut RegressionPartial,
        parameter: &Par,
    ) -> Result<()> {
        let block = self.factors(input, parameter)?;
        match partial {
            RegressionPartial::Empty => *partial = RegressionPartial::Qr(block),
            RegressionPartial::Qr(acc) => merge_into(acc, &block)?,
            RegressionPartial::NormalEquations(_) => return Err(Error::foreign_partial("QR")),
        }
        trace!(rows = partial.n_rows(), "accumulated QR factors");
        Ok(())
    }

    pub fn merge_all(&self, locals: &[&RegressionPartial], partial: &mut RegressionPartial) -> Result<()> {
        let mut acc = partial.clone();
        for local in locals {
            match local {
                RegressionPartial::Empty => {}
                RegressionPartial::Qr(f) => match &mut acc {
                    RegressionPartial::Qr(a) => merge_into(a, f)?,
                    RegressionPartial::Empty => {
                        f.check_layout()?;
                        acc = RegressionPartial::Qr(f.clone());
                    }
                    RegressionPartial::NormalEquations(_) => return Err(Error::foreign_partial("QR")),
                },
                RegressionPartial::NormalEquations(_) => return Err(Error::foreign_partial("QR")),
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
            RegressionPartial::Qr(f) if f.n_rows > 0 => {
                parameter.validate(f.shape.n_responses)?;
                f.check_layout()?;
                self.solve(f)
            }
            RegressionPartial::NormalEquations(_) => Err(Error::foreign_partial("QR")),
            _ => Err(Error::EmptyPartialResult),
        }
    }

    /// Back-substitution `R beta = Q'y` for every response
    fn solve(&self, factors: &QrFactors) -> Result<RegressionModel<T>> {
        let shape = factors.shape;
        let dim = shape.dim();
        let k = shape.n_responses;
        let r = &factors.r;

        let largest = (0..dim).fold(0.0f64, |m, i| m.max(r[i * dim + i].abs()));
        let tolerance = largest * RANK_TOLERANCE;
        if (0..dim).any(|i| r[i * dim + i].abs() <= tolerance) {
            return Err(Error::singular("R factor"));
        }

        let mut solutions = vec![0.0; dim * k];
        for (c, beta) in solutions.chunks_mut(dim).enumerate() {
            for i in (0..dim).rev() {
                let row = &r[i * dim + i + 1..(i + 1) * dim];
                let known = ComputePrimitives::<f64>::dot_product(&self.primitives, row, &beta[i + 1..]);
                beta[i] = (factors.qty[i * k + c] - known) / r[i * dim + i];
            }
        }
        check_finite(&solutions, "coefficients")?;
        Ok(assemble_model(&shape, &solutions))
    }
}

impl<T: Numeric, P: KernelBackend<T>> Kernel for QrKernel<T, P> {
    fn backend(&self) -> &'static str {
        ComputePrimitives::<T>::backend_name(&self.primitives)
    }

    fn level(&self) -> CpuFeatureLevel {
        ComputePrimitives::<T>::level(&self.primitives)
    }
}
