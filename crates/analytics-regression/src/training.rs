//! Training algorithms
//!
//! [`LinearRegression`] and [`RidgeRegression`] describe the two training
//! families to the containers. Linear regression supports both methods;
//! ridge regression only has normal equations kernels.

use crate::factories::{LINEAR_TABLE, RIDGE_TABLE};
use crate::input::TrainingInput;
use crate::kernels::{NormalEquationsKernel, QrKernel};
use crate::model::RegressionModel;
use crate::parameter::{RidgeParameter, TrainingParameter};
use crate::partial::RegressionPartial;
use analytics_core::{
    Algorithm, BatchKernel, DistributedKernel, KernelBackend, KernelTable, Numeric, OnlineKernel,
    Result,
};
use std::fmt;
use std::marker::PhantomData;

/// Training method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegressionMethod {
    /// Cholesky solve of the accumulated cross-products
    #[default]
    NormalEquations,
    /// Merged Householder QR factors
    Qr,
}

impl fmt::Display for RegressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegressionMethod::NormalEquations => "normal_equations",
            RegressionMethod::Qr => "qr",
        })
    }
}

/// Ordinary least squares
pub struct LinearRegression<T>(PhantomData<T>);

impl<T: Numeric> Algorithm for LinearRegression<T> {
    type Fp = T;
    type Method = RegressionMethod;
    type Parameter = TrainingParameter;
    type Input<'a> = TrainingInput<'a, T>;
    type PartialResult = RegressionPartial;
    type Model = RegressionModel<T>;

    const NAME: &'static str = "linear_regression";

    fn kernel_table() -> &'static KernelTable<RegressionMethod> {
        &LINEAR_TABLE
    }
}

/// Least squares with an L2 penalty on the non-intercept coefficients
pub struct RidgeRegression<T>(PhantomData<T>);

impl<T: Numeric> Algorithm for RidgeRegression<T> {
    type Fp = T;
    type Method = RegressionMethod;
    type Parameter = RidgeParameter;
    type Input<'a> = TrainingInput<'a, T>;
    type PartialResult = RegressionPartial;
    type Model = RegressionModel<T>;

    const NAME: &'static str = "ridge_regression";

    fn kernel_table() -> &'static KernelTable<RegressionMethod> {
        &RIDGE_TABLE
    }
}

/// Implement the three kernel traits of `$alg` by forwarding to the
/// kernel's `train`, `update`, `merge_all` and `finalize`
macro_rules! training_kernel {
    ($kernel:ident, $alg:ident) => {
        impl<T: Numeric, P: KernelBackend<T>> BatchKernel<$alg<T>> for $kernel<T, P> {
            fn compute(
                &self,
                input: &TrainingInput<'_, T>,
                parameter: &<$alg<T> as Algorithm>::Parameter,
            ) -> Result<RegressionModel<T>> {
                self.train(input, parameter)
            }
        }

        impl<T: Numeric, P: KernelBackend<T>> OnlineKernel<$alg<T>> for $kernel<T, P> {
            fn compute(
                &self,
                input: &TrainingInput<'_, T>,
                partial: &mut RegressionPartial,
                parameter: &<$alg<T> as Algorithm>::Parameter,
            ) -> Result<()> {
                self.update(input, partial, parameter)
            }

            fn finalize(
                &self,
                partial: &RegressionPartial,
                parameter: &<$alg<T> as Algorithm>::Parameter,
            ) -> Result<RegressionModel<T>> {
                $kernel::finalize(self, partial, parameter)
            }
        }

        impl<T: Numeric, P: KernelBackend<T>> DistributedKernel<$alg<T>> for $kernel<T, P> {
            fn aggregate(
                &self,
                locals: &[&RegressionPartial],
                partial: &mut RegressionPartial,
                _parameter: &<$alg<T> as Algorithm>::Parameter,
            ) -> Result<()> {
                self.merge_all(locals, partial)
            }

            fn finalize(
                &self,
                partial: &RegressionPartial,
                parameter: &<$alg<T> as Algorithm>::Parameter,
            ) -> Result<RegressionModel<T>> {
                $kernel::finalize(self, partial, parameter)
            }
        }
    };
}

training_kernel!(NormalEquationsKernel, LinearRegression);
training_kernel!(NormalEquationsKernel, RidgeRegression);
training_kernel!(QrKernel, LinearRegression);
