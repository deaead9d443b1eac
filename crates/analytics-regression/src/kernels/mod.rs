//! Training kernels
//!
//! Both kernel families expose the same four entry points, `train`,
//! `update`, `merge_all` and `finalize`, generic over the parameter type.
//! The algorithm descriptors in `training` wire them to the batch, online and
//! distributed kernel traits.

mod normal_equations;
mod qr;

pub use normal_equations::NormalEquationsKernel;
pub use qr::QrKernel;

use crate::input::TrainingInput;
use crate::model::RegressionModel;
use crate::parameter::RegressionParameter;
use crate::partial::PartialShape;
use analytics_core::{Error, Numeric, NumericTable, Result};
use std::ops::Range;

/// Pivots below this fraction of the largest one are treated as zero
pub(crate) const RANK_TOLERANCE: f64 = 1e-10;

pub(crate) fn shape_of<T: Numeric, Par: RegressionParameter>(
    input: &TrainingInput<'_, T>,
    parameter: &Par,
) -> PartialShape {
    PartialShape {
        n_features: input.n_features(),
        n_responses: input.n_responses(),
        intercept: parameter.training().intercept,
    }
}

/// Copy the columns of `table` over `rows`, optionally preceded by a column of ones
pub(crate) fn gather_columns<T: Numeric>(
    table: &dyn NumericTable<T>,
    rows: Range<usize>,
    ones: bool,
) -> Vec<Vec<T>> {
    let mut columns = Vec::with_capacity(table.n_columns() + usize::from(ones));
    if ones {
        columns.push(vec![T::one(); rows.len()]);
    }
    for c in 0..table.n_columns() {
        let mut column = Vec::with_capacity(rows.len());
        table.read_column(c, rows.clone(), &mut column);
        columns.push(column);
    }
    columns
}

pub(crate) fn check_finite(values: &[f64], context: &str) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::non_finite(context))
    }
}

/// Build a model from per-response solutions of width `shape.dim()`
pub(crate) fn assemble_model<T: Numeric>(shape: &PartialShape, solutions: &[f64]) -> RegressionModel<T> {
    let dim = shape.dim();
    let mut beta = Vec::with_capacity(shape.n_responses * (shape.n_features + 1));
    for solution in solutions.chunks(dim) {
        if !shape.intercept {
            beta.push(T::zero());
        }
        beta.extend(solution.iter().map(|&v| T::narrow(v)));
    }
    RegressionModel::new(shape.n_features, shape.n_responses, shape.intercept, beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics_core::DenseTable;

    #[test]
    fn test_gather_columns_with_ones() {
        let t = DenseTable::from_rows(2, vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let cols = gather_columns(&t, 1..3, true);
        assert_eq!(cols, vec![vec![1.0, 1.0], vec![3.0, 5.0], vec![4.0, 6.0]]);
    }

    #[test]
    fn test_assemble_pads_missing_intercept() {
        let shape = PartialShape {
            n_features: 2,
            n_responses: 2,
            intercept: false,
        };
        let model: RegressionModel<f64> = assemble_model(&shape, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(model.beta(), &[0.0, 1.0, 2.0, 0.0, 3.0, 4.0]);
        assert_eq!(model.coefficients(1), &[3.0, 4.0]);
        assert_eq!(model.intercept(0), 0.0);
    }
}
