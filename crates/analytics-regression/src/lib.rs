//! Linear and ridge regression
//!
//! Training runs in batch, online and distributed modes through the
//! containers of `analytics-core`; prediction is batch only.
//!
//! # Methods
//!
//! - **Normal equations**: accumulates X'X and X'Y, solves with Cholesky.
//!   Available for linear and ridge regression.
//! - **QR**: keeps the R factor of the rows seen so far and merges factors
//!   pairwise. Linear regression only.
//!
//! # Example
//!
//! ```rust
//! use analytics_core::{BatchContainer, DenseTable, Environment};
//! use analytics_regression::{LinearRegression, RegressionMethod, TrainingInput, TrainingParameter};
//!
//! let x = DenseTable::from_fn(100, 1, |r, _| r as f64);
//! let y = DenseTable::from_fn(100, 1, |r, _| 2.0 * r as f64 + 1.0);
//!
//! let mut training = BatchContainer::<LinearRegression<f64>>::new(
//!     &Environment::detect(),
//!     RegressionMethod::NormalEquations,
//!     TrainingParameter::default(),
//! )
//! .unwrap();
//! training.compute(&TrainingInput::new(&x, &y)).unwrap();
//!
//! let model = training.result().unwrap();
//! assert!((model.intercept(0) - 1.0).abs() < 1e-9);
//! assert!((model.coefficients(0)[0] - 2.0).abs() < 1e-9);
//! ```

mod factories;
pub mod input;
pub mod kernels;
pub mod model;
pub mod parameter;
pub mod partial;
pub mod prediction;
pub mod training;

pub use input::TrainingInput;
pub use kernels::{NormalEquationsKernel, QrKernel};
pub use model::RegressionModel;
pub use parameter::{RegressionParameter, RidgeParameter, TrainingParameter};
pub use partial::{CrossProducts, PartialShape, QrFactors, RegressionPartial};
pub use prediction::{
    PredictionInput, PredictionKernel, PredictionMethod, PredictionParameter, RegressionPrediction,
};
pub use training::{LinearRegression, RegressionMethod, RidgeRegression};
