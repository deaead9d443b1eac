//! Floating-point types accepted by analytics kernels
//!
//! Kernels are generic over [`Numeric`], which is implemented for `f32` and
//! `f64`. Accumulation always happens in `f64` (the aggregate type), so
//! single-precision inputs do not lose digits in long running sums.

use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Floating-point precision a kernel was compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Single,
    Double,
}

impl Precision {
    /// Precision of a numeric type
    pub fn of<T: Numeric>() -> Self {
        T::PRECISION
    }

    pub fn name(&self) -> &'static str {
        match self {
            Precision::Single => "single",
            Precision::Double => "double",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element type of numeric tables and models
pub trait Numeric:
    Float + Default + Debug + fmt::Display + Send + Sync + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Precision tag used as the first component of a kernel key
    const PRECISION: Precision;

    /// Convert to the aggregate type
    fn widen(self) -> f64;

    /// Convert from the aggregate type, rounding if needed
    fn narrow(value: f64) -> Self;
}

impl Numeric for f32 {
    const PRECISION: Precision = Precision::Single;

    #[inline(always)]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline(always)]
    fn narrow(value: f64) -> Self {
        value as f32
    }
}

impl Numeric for f64 {
    const PRECISION: Precision = Precision::Double;

    #[inline(always)]
    fn widen(self) -> f64 {
        self
    }

    #[inline(always)]
    fn narrow(value: f64) -> Self {
        value
    }
}

/// Widen a slice into a reusable `f64` buffer
pub fn widen_into<T: Numeric>(src: &[T], dst: &mut Vec<f64>) {
    dst.clear();
    dst.extend(src.iter().map(|&v| v.widen()));
}

/// Narrow an `f64` slice into a freshly allocated vector
pub fn narrow_all<T: Numeric>(src: &[f64]) -> Vec<T> {
    src.iter().map(|&v| T::narrow(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_tags() {
        assert_eq!(Precision::of::<f32>(), Precision::Single);
        assert_eq!(Precision::of::<f64>(), Precision::Double);
        assert_eq!(Precision::Single.to_string(), "single");
        assert_eq!(Precision::Double.to_string(), "double");
    }

    #[test]
    fn test_widen_and_narrow() {
        assert_eq!(1.5f32.widen(), 1.5f64);
        assert_eq!(f32::narrow(0.25), 0.25f32);
        assert_eq!(f64::narrow(1e300), 1e300);
        assert!(f32::narrow(1e300).is_infinite());

        let mut buf = vec![9.0];
        widen_into(&[1.0f32, 2.0, 3.0], &mut buf);
        assert_eq!(buf, vec![1.0, 2.0, 3.0]);
        assert_eq!(narrow_all::<f32>(&buf), vec![1.0f32, 2.0, 3.0]);
    }

    #[test]
    fn test_precision_serde() {
        let json = serde_json::to_string(&Precision::Single).unwrap();
        assert_eq!(json, "\"single\"");
        let back: Precision = serde_json::from_str("\"double\"").unwrap();
        assert_eq!(back, Precision::Double);
    }
}
