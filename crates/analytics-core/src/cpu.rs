//! CPU feature detection
//!
//! Features are probed once per process and cached. Kernels are registered
//! against a [`CpuFeatureLevel`]; the dispatcher walks the levels downward from
//! the detected one.

use crate::error::{Error, Result};
use bitflags::bitflags;
use lazy_static::lazy_static;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Instruction-set extensions relevant to kernel selection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CpuFeatures: u32 {
        const SSE4_2 = 1 << 0;
        const AVX = 1 << 1;
        const AVX2 = 1 << 2;
        const FMA = 1 << 3;
        const AVX512F = 1 << 4;
    }
}

impl CpuFeatures {
    /// Probe the running CPU
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            let mut features = Self::empty();
            if is_x86_feature_detected!("sse4.2") {
                features |= Self::SSE4_2;
            }
            if is_x86_feature_detected!("avx") {
                features |= Self::AVX;
            }
            if is_x86_feature_detected!("avx2") {
                features |= Self::AVX2;
            }
            if is_x86_feature_detected!("fma") {
                features |= Self::FMA;
            }
            if is_x86_feature_detected!("avx512f") {
                features |= Self::AVX512F;
            }
            features
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            Self::empty()
        }
    }
}

lazy_static! {
    static ref DETECTED_FEATURES: CpuFeatures = CpuFeatures::detect();
    static ref DETECTED_LEVEL: CpuFeatureLevel = CpuFeatureLevel::from_features(*DETECTED_FEATURES);
}

/// Ordered CPU capability level, baseline first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CpuFeatureLevel {
    /// Portable scalar code
    Baseline,
    /// SSE4.2
    Sse42,
    /// AVX2 + FMA
    Avx2,
    /// AVX-512F on top of AVX2 + FMA
    Avx512,
}

impl CpuFeatureLevel {
    /// All levels, lowest first
    pub const ALL: [CpuFeatureLevel; 4] = [
        CpuFeatureLevel::Baseline,
        CpuFeatureLevel::Sse42,
        CpuFeatureLevel::Avx2,
        CpuFeatureLevel::Avx512,
    ];

    /// Highest level supported by a feature set
    pub fn from_features(features: CpuFeatures) -> Self {
        let avx2 = features.contains(CpuFeatures::AVX2 | CpuFeatures::FMA);
        if avx2 && features.contains(CpuFeatures::AVX512F) {
            CpuFeatureLevel::Avx512
        } else if avx2 {
            CpuFeatureLevel::Avx2
        } else if features.contains(CpuFeatures::SSE4_2) {
            CpuFeatureLevel::Sse42
        } else {
            CpuFeatureLevel::Baseline
        }
    }

    /// Level of the running CPU, detected once per process
    pub fn detected() -> Self {
        *DETECTED_LEVEL
    }

    /// Features of the running CPU, detected once per process
    pub fn detected_features() -> CpuFeatures {
        *DETECTED_FEATURES
    }

    /// This level and every level below it, highest first
    pub fn descending(self) -> impl Iterator<Item = CpuFeatureLevel> {
        Self::ALL.into_iter().rev().filter(move |level| *level <= self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CpuFeatureLevel::Baseline => "baseline",
            CpuFeatureLevel::Sse42 => "sse42",
            CpuFeatureLevel::Avx2 => "avx2",
            CpuFeatureLevel::Avx512 => "avx512",
        }
    }
}

impl fmt::Display for CpuFeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CpuFeatureLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" | "scalar" | "generic" => Ok(CpuFeatureLevel::Baseline),
            "sse42" | "sse4.2" => Ok(CpuFeatureLevel::Sse42),
            "avx2" => Ok(CpuFeatureLevel::Avx2),
            "avx512" | "avx512f" => Ok(CpuFeatureLevel::Avx512),
            other => Err(Error::InvalidParameter(format!(
                "unknown CPU feature level '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(CpuFeatureLevel::Baseline < CpuFeatureLevel::Sse42);
        assert!(CpuFeatureLevel::Sse42 < CpuFeatureLevel::Avx2);
        assert!(CpuFeatureLevel::Avx2 < CpuFeatureLevel::Avx512);
    }

    #[test]
    fn test_descending_walk() {
        let walk: Vec<_> = CpuFeatureLevel::Avx2.descending().collect();
        assert_eq!(
            walk,
            vec![
                CpuFeatureLevel::Avx2,
                CpuFeatureLevel::Sse42,
                CpuFeatureLevel::Baseline
            ]
        );
        let walk: Vec<_> = CpuFeatureLevel::Baseline.descending().collect();
        assert_eq!(walk, vec![CpuFeatureLevel::Baseline]);
    }

    #[test]
    fn test_level_from_features() {
        assert_eq!(
            CpuFeatureLevel::from_features(CpuFeatures::empty()),
            CpuFeatureLevel::Baseline
        );
        assert_eq!(
            CpuFeatureLevel::from_features(CpuFeatures::SSE4_2 | CpuFeatures::AVX2),
            CpuFeatureLevel::Sse42,
            "AVX2 without FMA must not select the AVX2 level"
        );
        assert_eq!(
            CpuFeatureLevel::from_features(CpuFeatures::AVX2 | CpuFeatures::FMA),
            CpuFeatureLevel::Avx2
        );
        assert_eq!(
            CpuFeatureLevel::from_features(CpuFeatures::all()),
            CpuFeatureLevel::Avx512
        );
        assert_eq!(
            CpuFeatureLevel::from_features(CpuFeatures::AVX512F),
            CpuFeatureLevel::Baseline
        );
    }

    #[test]
    fn test_detection_is_stable() {
        let first = CpuFeatureLevel::detected();
        let second = CpuFeatureLevel::detected();
        assert_eq!(first, second);
        assert_eq!(
            first,
            CpuFeatureLevel::from_features(CpuFeatureLevel::detected_features())
        );
    }

    #[test]
    fn test_parse_round_trip() {
        for level in CpuFeatureLevel::ALL {
            assert_eq!(level.to_string().parse::<CpuFeatureLevel>().unwrap(), level);
        }
        assert!("neon".parse::<CpuFeatureLevel>().is_err());
    }
}
