//! Process configuration
//!
//! An [`Environment`] is built once, before any container, and passed by
//! reference to container constructors. It fixes the CPU level kernels are
//! dispatched against and the error policy of every status the container
//! reports.
//!
//! | Variable                 | Values                                  |
//! |--------------------------|-----------------------------------------|
//! | `ANALYTICS_CPU`          | `baseline`, `sse42`, `avx2`, `avx512`   |
//! | `ANALYTICS_ERROR_POLICY` | `raise`, `accumulate`                   |
//!
//! `ANALYTICS_CPU` can only lower the dispatch level, never raise it above
//! what the hardware supports.

use crate::cpu::CpuFeatureLevel;
use crate::error::Result;
use crate::status::{ErrorPolicy, Status};
use lazy_static::lazy_static;
use tracing::{debug, warn};

/// Environment variable capping the dispatch level
pub const CPU_VAR: &str = "ANALYTICS_CPU";
/// Environment variable selecting the error policy
pub const ERROR_POLICY_VAR: &str = "ANALYTICS_ERROR_POLICY";

lazy_static! {
    static ref GLOBAL: Environment = Environment::from_env().unwrap_or_else(|e| {
        warn!("ignoring invalid analytics environment: {e}");
        Environment::detect()
    });
}

/// CPU level and error policy shared by the containers built from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    cpu: CpuFeatureLevel,
    error_policy: ErrorPolicy,
}

impl Environment {
    /// Detected CPU level with the default (raising) error policy
    pub fn detect() -> Self {
        Self {
            cpu: CpuFeatureLevel::detected(),
            error_policy: ErrorPolicy::default(),
        }
    }

    /// Read the `ANALYTICS_*` variables on top of [`Environment::detect`]
    pub fn from_env() -> Result<Self> {
        let mut env = Self::detect();
        if let Ok(value) = std::env::var(CPU_VAR) {
            env = env.with_cpu_limit(value.parse()?);
        }
        if let Ok(value) = std::env::var(ERROR_POLICY_VAR) {
            env = env.with_error_policy(value.parse()?);
        }
        debug!(cpu = %env.cpu, policy = %env.error_policy, "analytics environment");
        Ok(env)
    }

    /// Process-wide environment, read from the process environment on first use
    pub fn global() -> &'static Environment {
        &GLOBAL
    }

    /// Cap the dispatch level; the result never exceeds the detected level
    pub fn with_cpu_limit(mut self, limit: CpuFeatureLevel) -> Self {
        self.cpu = limit.min(CpuFeatureLevel::detected());
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Highest level the dispatcher may select
    pub fn cpu(&self) -> CpuFeatureLevel {
        self.cpu
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Fresh, empty status carrying this environment's policy
    pub fn status(&self) -> Status {
        Status::new(self.error_policy)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_defaults() {
        let env = Environment::detect();
        assert_eq!(env.cpu(), CpuFeatureLevel::detected());
        assert_eq!(env.error_policy(), ErrorPolicy::Raise);
        assert_eq!(env.status().policy(), ErrorPolicy::Raise);
    }

    #[test]
    fn test_cpu_limit_never_exceeds_detected() {
        let env = Environment::detect().with_cpu_limit(CpuFeatureLevel::Avx512);
        assert!(env.cpu() <= CpuFeatureLevel::detected());

        let env = Environment::detect().with_cpu_limit(CpuFeatureLevel::Baseline);
        assert_eq!(env.cpu(), CpuFeatureLevel::Baseline);
    }

    #[test]
    fn test_policy_override() {
        let env = Environment::detect().with_error_policy(ErrorPolicy::Accumulate);
        assert_eq!(env.status().policy(), ErrorPolicy::Accumulate);
    }

    #[test]
    fn test_global_is_stable() {
        let a = Environment::global();
        let b = Environment::global();
        assert!(std::ptr::eq(a, b));
        assert!(a.cpu() <= CpuFeatureLevel::detected());
    }
}
