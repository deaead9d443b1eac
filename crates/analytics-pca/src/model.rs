//! PCA result

use analytics_core::{DenseTable, Error, Numeric, NumericTable, Result};
use serde::{Deserialize, Serialize};

/// Principal components of the correlation matrix
///
/// Components are ordered by decreasing eigenvalue. Each eigenvector is
/// stored as a row and signed so that its largest-magnitude entry is
/// positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaModel<T> {
    n_features: usize,
    n_components: usize,
    eigenvalues: Vec<T>,
    eigenvectors: Vec<T>,
    means: Vec<T>,
    variances: Vec<T>,
}

impl<T: Numeric> PcaModel<T> {
    pub(crate) fn new(
        n_features: usize,
        eigenvalues: Vec<T>,
        eigenvectors: Vec<T>,
        means: Vec<T>,
        variances: Vec<T>,
    ) -> Self {
        let n_components = eigenvalues.len();
        debug_assert_eq!(eigenvectors.len(), n_components * n_features);
        Self {
            n_features,
            n_components,
            eigenvalues,
            eigenvectors,
            means,
            variances,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Eigenvalues, largest first
    pub fn eigenvalues(&self) -> &[T] {
        &self.eigenvalues
    }

    /// Component `i` as a vector over the features
    pub fn eigenvector(&self, i: usize) -> &[T] {
        &self.eigenvectors[i * self.n_features..(i + 1) * self.n_features]
    }

    /// All components, `n_components x n_features`
    pub fn eigenvectors(&self) -> DenseTable<T> {
        DenseTable::from_fn(self.n_components, self.n_features, |r, c| {
            self.eigenvectors[r * self.n_features + c]
        })
    }

    pub fn means(&self) -> &[T] {
        &self.means
    }

    /// Sample variances (denominator `n - 1`)
    pub fn variances(&self) -> &[T] {
        &self.variances
    }

    /// Share of total variance carried by each kept component
    ///
    /// The trace of a correlation matrix equals the number of features.
    pub fn explained_variance_ratio(&self) -> Vec<f64> {
        let total = self.n_features as f64;
        self.eigenvalues.iter().map(|v| v.widen() / total).collect()
    }

    /// Project rows of `data` onto the components after standardizing them
    pub fn transform(&self, data: &dyn NumericTable<T>) -> Result<DenseTable<T>> {
        if data.n_columns() != self.n_features {
            return Err(Error::size_mismatch(
                self.n_features,
                data.n_columns(),
                "feature count of transform data",
            ));
        }
        let scale: Vec<f64> = self.variances.iter().map(|v| v.widen().sqrt()).collect();
        let mut row = Vec::with_capacity(self.n_features);
        let mut out = Vec::with_capacity(data.n_rows() * self.n_components);
        for r in 0..data.n_rows() {
            data.read_row(r, &mut row);
            for c in 0..self.n_components {
                let score = self
                    .eigenvector(c)
                    .iter()
                    .zip(&row)
                    .enumerate()
                    .map(|(j, (w, x))| w.widen() * (x.widen() - self.means[j].widen()) / scale[j])
                    .sum::<f64>();
                out.push(T::narrow(score));
            }
        }
        Ok(DenseTable::from_fn(data.n_rows(), self.n_components, |r, c| {
            out[r * self.n_components + c]
        }))
    }
}
