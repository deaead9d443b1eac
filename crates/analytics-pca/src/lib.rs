//! Principal component analysis
//!
//! Correlation-method PCA in batch, online and distributed modes. Workers
//! accumulate counts, means and centered cross-products; the master merges
//! them pairwise and decomposes the resulting correlation matrix.
//!
//! ```rust
//! use analytics_core::{BatchContainer, DenseTable, Environment};
//! use analytics_pca::{Pca, PcaMethod, PcaParameter};
//!
//! let data = DenseTable::from_fn(50, 2, |r, c| (r as f64) * (c as f64 + 1.0) + (r % 3) as f64);
//! let mut pca = BatchContainer::<Pca<f64>>::new(
//!     &Environment::detect(),
//!     PcaMethod::Correlation,
//!     PcaParameter::default(),
//! )
//! .unwrap();
//! pca.compute(&(&data as &dyn analytics_core::NumericTable<f64>)).unwrap();
//!
//! let model = pca.result().unwrap();
//! assert_eq!(model.n_components(), 2);
//! assert!(model.eigenvalues()[0] >= model.eigenvalues()[1]);
//! ```

pub mod algorithm;
pub mod kernel;
pub mod model;
pub mod parameter;
pub mod partial;

pub use algorithm::{Pca, PcaMethod};
pub use kernel::CorrelationKernel;
pub use model::PcaModel;
pub use parameter::PcaParameter;
pub use partial::PcaPartial;
