//! Training parameters
//!
//! Every regression algorithm embeds a [`TrainingParameter`]; ridge adds its
//! penalties on top.

use analytics_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Options shared by all regression training algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingParameter {
    /// Fit an intercept term
    pub intercept: bool,
}

impl Default for TrainingParameter {
    fn default() -> Self {
        Self { intercept: true }
    }
}

impl TrainingParameter {
    pub fn without_intercept() -> Self {
        Self { intercept: false }
    }
}

/// Ridge regression options
///
/// `ridge` holds either one penalty applied to every response or one penalty
/// per response. The intercept is never penalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeParameter {
    pub base: TrainingParameter,
    pub ridge: Vec<f64>,
}

impl Default for RidgeParameter {
    fn default() -> Self {
        Self {
            base: TrainingParameter::default(),
            ridge: vec![1.0],
        }
    }
}

impl RidgeParameter {
    /// Same penalty for every response
    pub fn new(ridge: f64) -> Self {
        Self {
            base: TrainingParameter::default(),
            ridge: vec![ridge],
        }
    }

    /// One penalty per response
    pub fn per_response(ridge: Vec<f64>) -> Self {
        Self {
            base: TrainingParameter::default(),
            ridge,
        }
    }

    pub fn with_intercept(mut self, intercept: bool) -> Self {
        self.base.intercept = intercept;
        self
    }
}

/// View of a parameter struct as seen by the training kernels
pub trait RegressionParameter: Clone + Debug + Send + Sync + 'static {
    fn training(&self) -> &TrainingParameter;

    /// Diagonal penalty for `response`
    fn penalty(&self, _response: usize) -> f64 {
        0.0
    }

    /// Check the parameter against the number of responses
    fn validate(&self, _n_responses: usize) -> Result<()> {
        Ok(())
    }
}

impl RegressionParameter for TrainingParameter {
    fn training(&self) -> &TrainingParameter {
        self
    }
}

impl RegressionParameter for RidgeParameter {
    fn training(&self) -> &TrainingParameter {
        &self.base
    }

    fn penalty(&self, response: usize) -> f64 {
        match self.ridge.as_slice() {
            [single] => *single,
            values => values.get(response).copied().unwrap_or(0.0),
        }
    }

    fn validate(&self, n_responses: usize) -> Result<()> {
        if self.ridge.is_empty() {
            return Err(Error::InvalidParameter("ridge parameter list is empty".into()));
        }
        if self.ridge.len() != 1 && self.ridge.len() != n_responses {
            return Err(Error::size_mismatch(n_responses, self.ridge.len(), "ridge parameters"));
        }
        if let Some(bad) = self.ridge.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(Error::InvalidParameter(format!(
                "ridge parameter must be finite and non-negative, got {bad}"
            )));
        }
        Ok(())
    }
}
