//! Trained regression model

use analytics_core::{DenseTable, Numeric};
use serde::{Deserialize, Serialize};

/// Coefficients of a linear model with one row per response
///
/// Row `r` of `beta` is `[b0, b1, .., bp]` where `b0` is the intercept (zero
/// when the model was trained without one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel<T> {
    n_features: usize,
    n_responses: usize,
    intercept: bool,
    beta: Vec<T>,
}

impl<T: Numeric> RegressionModel<T> {
    pub(crate) fn new(n_features: usize, n_responses: usize, intercept: bool, beta: Vec<T>) -> Self {
        debug_assert_eq!(beta.len(), n_responses * (n_features + 1));
        Self {
            n_features,
            n_responses,
            intercept,
            beta,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_responses(&self) -> usize {
        self.n_responses
    }

    pub fn has_intercept(&self) -> bool {
        self.intercept
    }

    /// Full coefficient matrix, row-major, `n_responses x (n_features + 1)`
    pub fn beta(&self) -> &[T] {
        &self.beta
    }

    /// Coefficients of one response, intercept first
    pub fn beta_row(&self, response: usize) -> &[T] {
        let width = self.n_features + 1;
        &self.beta[response * width..(response + 1) * width]
    }

    pub fn intercept(&self, response: usize) -> T {
        self.beta_row(response)[0]
    }

    /// Feature coefficients of one response, without the intercept
    pub fn coefficients(&self, response: usize) -> &[T] {
        &self.beta_row(response)[1..]
    }

    /// Coefficient matrix as a table
    pub fn beta_table(&self) -> DenseTable<T> {
        DenseTable::from_fn(self.n_responses, self.n_features + 1, |r, c| {
            self.beta[r * (self.n_features + 1) + c]
        })
    }
}
