//! Numerical analytics with CPU-dispatched kernels
//!
//! Re-exports the workspace crates:
//!
//! - [`analytics_core`]: kernel tables, dispatch, status channel and containers
//! - [`analytics_regression`]: linear and ridge regression, prediction
//! - [`analytics_pca`]: correlation-method principal component analysis
//!
//! ```rust
//! use analytics::prelude::*;
//!
//! let x = DenseTable::from_fn(100, 1, |r, _| r as f64);
//! let y = DenseTable::from_fn(100, 1, |r, _| 2.0 * r as f64 + 1.0);
//!
//! let mut online = OnlineContainer::<LinearRegression<f64>>::new(
//!     Environment::global(),
//!     RegressionMethod::Qr,
//!     TrainingParameter::default(),
//! )
//! .unwrap();
//! for start in (0..100).step_by(25) {
//!     let xb = x.row_block(start..start + 25);
//!     let yb = y.row_block(start..start + 25);
//!     online.compute(&TrainingInput::new(&xb, &yb)).unwrap();
//! }
//! online.finalize_compute().unwrap();
//! assert!((online.result().unwrap().coefficients(0)[0] - 2.0).abs() < 1e-9);
//! ```

pub use analytics_core;
pub use analytics_pca;
pub use analytics_regression;

pub mod prelude {
    pub use analytics_core::{
        Algorithm, BatchContainer, CpuFeatureLevel, DenseTable, DistributedContainer,
        Environment, Error, ErrorKind, ErrorPolicy, Layout, NumericTable, OnlineContainer,
        PartialModels, Result, Status, TableView,
    };
    pub use analytics_pca::{Pca, PcaMethod, PcaModel, PcaParameter};
    pub use analytics_regression::{
        LinearRegression, PredictionInput, PredictionMethod, PredictionParameter,
        RegressionMethod, RegressionModel, RegressionPrediction, RidgeParameter, RidgeRegression,
        TrainingInput, TrainingParameter,
    };
}
