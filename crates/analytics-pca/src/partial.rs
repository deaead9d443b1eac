//! Running moments of a PCA computation

use analytics_core::{Error, PartialResult, Result};
use serde::{Deserialize, Serialize};

/// Observation count, column means and centered cross-products
///
/// Blocks are combined with the pairwise update of Chan et al., so merge
/// order only affects rounding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PcaPartial {
    pub n: usize,
    pub means: Vec<f64>,
    /// `p x p`, row-major, `sum (x_i - mean_i)(x_j - mean_j)`
    pub cross: Vec<f64>,
}

impl PartialResult for PcaPartial {
    fn is_empty(&self) -> bool {
        self.n == 0
    }

    fn validate(&self) -> Result<()> {
        self.check_layout()
    }
}

impl PcaPartial {
    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    /// `cross` must be square in the number of means
    pub fn check_layout(&self) -> Result<()> {
        let p = self.n_features();
        if self.cross.len() != p * p {
            return Err(Error::size_mismatch(p * p, self.cross.len(), "length of cross-products"));
        }
        Ok(())
    }

    /// Combine two partials, leaving both inputs untouched
    pub fn merged(&self, other: &PcaPartial) -> Result<PcaPartial> {
        self.check_layout()?;
        other.check_layout()?;
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Ok(other.clone());
        }
        let p = self.n_features();
        if other.n_features() != p {
            return Err(Error::size_mismatch(p, other.n_features(), "feature count"));
        }

        let (na, nb) = (self.n as f64, other.n as f64);
        let n = na + nb;
        let delta: Vec<f64> = other
            .means
            .iter()
            .zip(&self.means)
            .map(|(b, a)| b - a)
            .collect();
        let weight = na * nb / n;

        let means = self
            .means
            .iter()
            .zip(&delta)
            .map(|(a, d)| a + d * nb / n)
            .collect();
        let mut cross = Vec::with_capacity(p * p);
        for i in 0..p {
            for j in 0..p {
                let k = i * p + j;
                cross.push(self.cross[k] + other.cross[k] + delta[i] * delta[j] * weight);
            }
        }
        Ok(PcaPartial {
            n: self.n + other.n,
            means,
            cross,
        })
    }
}
