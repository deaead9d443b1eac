//! Partial results of regression training
//!
//! Statistics are accumulated in `f64` whatever the input precision. The
//! layout of each variant is private to the kernel family that produces it;
//! kernels reject variants produced by another method.

use analytics_core::{Error, PartialResult, Result};
use serde::{Deserialize, Serialize};

/// Shape shared by every regression partial result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialShape {
    pub n_features: usize,
    pub n_responses: usize,
    pub intercept: bool,
}

impl PartialShape {
    /// Width of the design matrix, intercept column included
    pub fn dim(&self) -> usize {
        self.n_features + usize::from(self.intercept)
    }

    pub(crate) fn check_compatible(&self, other: &PartialShape) -> Result<()> {
        if self.n_features != other.n_features {
            return Err(Error::size_mismatch(self.n_features, other.n_features, "feature count"));
        }
        if self.n_responses != other.n_responses {
            return Err(Error::size_mismatch(
                self.n_responses,
                other.n_responses,
                "response count",
            ));
        }
        if self.intercept != other.intercept {
            return Err(Error::InvalidParameter(
                "partial results disagree on the intercept setting".into(),
            ));
        }
        Ok(())
    }

    /// Check a `dim x dim` matrix and a `dim x n_responses` right-hand side
    fn check_buffers(&self, square: &[f64], rhs: &[f64], names: (&str, &str)) -> Result<()> {
        let dim = self.dim();
        if square.len() != dim * dim {
            return Err(Error::size_mismatch(dim * dim, square.len(), names.0));
        }
        if rhs.len() != dim * self.n_responses {
            return Err(Error::size_mismatch(dim * self.n_responses, rhs.len(), names.1));
        }
        Ok(())
    }
}

/// X'X and X'Y accumulated over the rows seen so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossProducts {
    pub shape: PartialShape,
    pub n_rows: usize,
    /// `dim x dim`, row-major, symmetric
    pub xtx: Vec<f64>,
    /// `dim x n_responses`, row-major
    pub xty: Vec<f64>,
}

impl CrossProducts {
    pub fn zeros(shape: PartialShape) -> Self {
        let dim = shape.dim();
        Self {
            shape,
            n_rows: 0,
            xtx: vec![0.0; dim * dim],
            xty: vec![0.0; dim * shape.n_responses],
        }
    }

    /// Add another block's cross-products
    pub fn merge(&mut self, other: &CrossProducts) -> Result<()> {
        self.shape.check_compatible(&other.shape)?;
        self.check_layout()?;
        other.check_layout()?;
        self.add(other);
        Ok(())
    }

    pub fn check_layout(&self) -> Result<()> {
        self.shape.check_buffers(&self.xtx, &self.xty, ("length of X'X", "length of X'Y"))
    }

    // Callers guarantee equal shapes and checked layouts
    pub(crate) fn add(&mut self, other: &CrossProducts) {
        self.n_rows += other.n_rows;
        for (a, b) in self.xtx.iter_mut().zip(&other.xtx) {
            *a += b;
        }
        for (a, b) in self.xty.iter_mut().zip(&other.xty) {
            *a += b;
        }
    }
}

/// Upper-triangular R and Q'Y of the rows seen so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrFactors {
    pub shape: PartialShape,
    pub n_rows: usize,
    /// `dim x dim`, row-major, upper triangular
    pub r: Vec<f64>,
    /// `dim x n_responses`, row-major
    pub qty: Vec<f64>,
}

impl QrFactors {
    pub fn check_layout(&self) -> Result<()> {
        self.shape.check_buffers(&self.r, &self.qty, ("length of R", "length of Q'Y"))
    }
}

/// Accumulated training state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum RegressionPartial {
    #[default]
    Empty,
    NormalEquations(CrossProducts),
    Qr(QrFactors),
}

impl RegressionPartial {
    pub fn shape(&self) -> Option<&PartialShape> {
        match self {
            RegressionPartial::Empty => None,
            RegressionPartial::NormalEquations(cp) => Some(&cp.shape),
            RegressionPartial::Qr(qr) => Some(&qr.shape),
        }
    }

    /// Number of observations folded in
    pub fn n_rows(&self) -> usize {
        match self {
            RegressionPartial::Empty => 0,
            RegressionPartial::NormalEquations(cp) => cp.n_rows,
            RegressionPartial::Qr(qr) => qr.n_rows,
        }
    }
}

impl PartialResult for RegressionPartial {
    fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    fn validate(&self) -> Result<()> {
        match self {
            RegressionPartial::Empty => Ok(()),
            RegressionPartial::NormalEquations(cp) => cp.check_layout(),
            RegressionPartial::Qr(qr) => qr.check_layout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics_core::ErrorKind;

    fn shape(n_features: usize) -> PartialShape {
        PartialShape {
            n_features,
            n_responses: 1,
            intercept: true,
        }
    }

    #[test]
    fn test_cross_products_merge() {
        let mut a = CrossProducts::zeros(shape(1));
        a.n_rows = 2;
        a.xtx = vec![2.0, 1.0, 1.0, 1.0];
        a.xty = vec![3.0, 1.0];
        let b = a.clone();
        a.merge(&b).unwrap();
        assert_eq!(a.n_rows, 4);
        assert_eq!(a.xtx, vec![4.0, 2.0, 2.0, 2.0]);
        assert_eq!(a.xty, vec![6.0, 2.0]);
    }

    #[test]
    fn test_merge_rejects_other_shapes() {
        let mut a = CrossProducts::zeros(shape(1));
        let b = CrossProducts::zeros(shape(2));
        let err = a.merge(&b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        assert_eq!(a, CrossProducts::zeros(shape(1)));
    }

    #[test]
    fn test_short_buffers_are_rejected() {
        let mut short = CrossProducts::zeros(shape(1));
        short.n_rows = 3;
        short.xtx = vec![1.0];
        let err = RegressionPartial::NormalEquations(short.clone()).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);

        let mut acc = CrossProducts::zeros(shape(1));
        let before = acc.clone();
        assert_eq!(acc.merge(&short).unwrap_err().kind(), ErrorKind::DimensionMismatch);
        assert_eq!(acc, before);

        let qr = QrFactors {
            shape: shape(2),
            n_rows: 4,
            r: vec![0.0; 9],
            qty: vec![0.0; 2],
        };
        assert_eq!(
            RegressionPartial::Qr(qr).validate().unwrap_err().kind(),
            ErrorKind::DimensionMismatch
        );
        assert!(RegressionPartial::Empty.validate().is_ok());
    }

    #[test]
    fn test_empty_partial() {
        let p = RegressionPartial::default();
        assert!(p.is_empty());
        assert!(p.shape().is_none());
        assert!(RegressionPartial::NormalEquations(CrossProducts::zeros(shape(3))).is_empty());
    }
}
