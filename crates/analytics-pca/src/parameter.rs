//! PCA parameters

use analytics_core::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcaParameter {
    /// Number of leading components to keep; all of them when `None`
    pub n_components: Option<usize>,
}

impl PcaParameter {
    pub fn with_components(n_components: usize) -> Self {
        Self {
            n_components: Some(n_components),
        }
    }

    /// Resolve the component count for `n_features` columns
    pub fn components(&self, n_features: usize) -> Result<usize> {
        match self.n_components {
            None => Ok(n_features),
            Some(k) if k >= 1 && k <= n_features => Ok(k),
            Some(k) => Err(Error::InvalidParameter(format!(
                "n_components must be in 1..={n_features}, got {k}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_count() {
        assert_eq!(PcaParameter::default().components(4).unwrap(), 4);
        assert_eq!(PcaParameter::with_components(2).components(4).unwrap(), 2);
        assert!(PcaParameter::with_components(0).components(4).is_err());
        assert!(PcaParameter::with_components(5).components(4).is_err());
    }
}
