//! Kernel factories and the regression kernel tables

use crate::kernels::{NormalEquationsKernel, QrKernel};
use crate::prediction::{PredictionKernel, PredictionMethod, RegressionPrediction};
use crate::training::{LinearRegression, RegressionMethod, RidgeRegression};
use analytics_core::{
    register_levels, BatchKernel, DistributedKernel, KernelBackend, KernelTable, Numeric,
    OnlineKernel,
};
use lazy_static::lazy_static;
use std::sync::Arc;

/// Define a factory producing `$kernel` behind the `$iface` trait object of `$alg`
macro_rules! kernel_factory {
    ($name:ident, $iface:ident, $alg:ident, $kernel:ident) => {
        fn $name<T: Numeric, P: KernelBackend<T>>() -> Arc<dyn $iface<$alg<T>>> {
            Arc::new($kernel::<T, P>::new(P::default()))
        }
    };
}

kernel_factory!(linear_ne_batch, BatchKernel, LinearRegression, NormalEquationsKernel);
kernel_factory!(linear_ne_online, OnlineKernel, LinearRegression, NormalEquationsKernel);
kernel_factory!(linear_ne_distributed, DistributedKernel, LinearRegression, NormalEquationsKernel);
kernel_factory!(linear_qr_batch, BatchKernel, LinearRegression, QrKernel);
kernel_factory!(linear_qr_online, OnlineKernel, LinearRegression, QrKernel);
kernel_factory!(linear_qr_distributed, DistributedKernel, LinearRegression, QrKernel);
kernel_factory!(ridge_ne_batch, BatchKernel, RidgeRegression, NormalEquationsKernel);
kernel_factory!(ridge_ne_online, OnlineKernel, RidgeRegression, NormalEquationsKernel);
kernel_factory!(ridge_ne_distributed, DistributedKernel, RidgeRegression, NormalEquationsKernel);
kernel_factory!(prediction_batch, BatchKernel, RegressionPrediction, PredictionKernel);

/// Register batch, online and distributed factories of `$alg` for each precision
macro_rules! register_training {
    (@one $table:ident, $alg:ident, $method:expr, $batch:ident, $online:ident, $distributed:ident, $fp:ty) => {
        register_levels!($table, dyn BatchKernel<$alg<$fp>>, $method, $batch, $fp);
        register_levels!($table, dyn OnlineKernel<$alg<$fp>>, $method, $online, $fp);
        register_levels!($table, dyn DistributedKernel<$alg<$fp>>, $method, $distributed, $fp);
    };
    ($table:ident, $alg:ident, $method:expr, $batch:ident, $online:ident, $distributed:ident) => {
        register_training!(@one $table, $alg, $method, $batch, $online, $distributed, f32);
        register_training!(@one $table, $alg, $method, $batch, $online, $distributed, f64);
    };
}

lazy_static! {
    pub(crate) static ref LINEAR_TABLE: KernelTable<RegressionMethod> = {
        let mut table = KernelTable::new("linear_regression");
        register_training!(
            table,
            LinearRegression,
            RegressionMethod::NormalEquations,
            linear_ne_batch,
            linear_ne_online,
            linear_ne_distributed
        );
        register_training!(
            table,
            LinearRegression,
            RegressionMethod::Qr,
            linear_qr_batch,
            linear_qr_online,
            linear_qr_distributed
        );
        table
    };

    pub(crate) static ref RIDGE_TABLE: KernelTable<RegressionMethod> = {
        let mut table = KernelTable::new("ridge_regression");
        register_training!(
            table,
            RidgeRegression,
            RegressionMethod::NormalEquations,
            ridge_ne_batch,
            ridge_ne_online,
            ridge_ne_distributed
        );
        table
    };

    pub(crate) static ref PREDICTION_TABLE: KernelTable<PredictionMethod> = {
        let mut table = KernelTable::new("regression_prediction");
        register_levels!(
            table,
            dyn BatchKernel<RegressionPrediction<f32>>,
            PredictionMethod::Default,
            prediction_batch,
            f32
        );
        register_levels!(
            table,
            dyn BatchKernel<RegressionPrediction<f64>>,
            PredictionMethod::Default,
            prediction_batch,
            f64
        );
        table
    };
}
