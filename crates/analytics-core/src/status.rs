//! Status channel for recoverable errors
//!
//! Every container operation reports a [`Status`]. An empty status means
//! success. What happens when an error is added depends on the
//! [`ErrorPolicy`] the status was created with:
//!
//! - [`ErrorPolicy::Raise`]: the first error aborts the call. `Status::add`
//!   hands the error back as `Err`, so `status.add(e)?` propagates it.
//! - [`ErrorPolicy::Accumulate`]: errors are recorded and the call returns
//!   normally; the caller must inspect the status.
//!
//! ```rust
//! use analytics_core::{Error, ErrorKind, ErrorPolicy, Status};
//!
//! let mut status = Status::new(ErrorPolicy::Accumulate);
//! status.add(Error::EmptyPartialResult).unwrap();
//! assert!(!status.is_ok());
//! assert!(status.contains(ErrorKind::EmptyPartialResult));
//!
//! let mut strict = Status::new(ErrorPolicy::Raise);
//! assert!(strict.add(Error::EmptyPartialResult).is_err());
//! ```

use crate::error::{Error, ErrorKind, Result};
use std::fmt;
use std::str::FromStr;

/// Behavior of a [`Status`] when an error is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorPolicy {
    /// Record errors and let the caller inspect them
    Accumulate,
    /// Turn the first error into an `Err` return
    #[default]
    Raise,
}

impl ErrorPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorPolicy::Accumulate => "accumulate",
            ErrorPolicy::Raise => "raise",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accumulate" | "nothrow" | "collect" => Ok(ErrorPolicy::Accumulate),
            "raise" | "throw" => Ok(ErrorPolicy::Raise),
            other => Err(Error::InvalidParameter(format!(
                "unknown error policy '{other}', expected 'raise' or 'accumulate'"
            ))),
        }
    }
}

/// Outcome of an operation: zero or more recoverable errors
#[derive(Debug, Default)]
pub struct Status {
    policy: ErrorPolicy,
    errors: Vec<Error>,
}

impl Status {
    /// Create an empty (successful) status with the given policy
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            errors: Vec::new(),
        }
    }

    /// Wrap a single error in an accumulating status
    pub fn from_error(error: Error) -> Self {
        Self {
            policy: ErrorPolicy::Accumulate,
            errors: vec![error],
        }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Add an error according to the policy
    ///
    /// Under [`ErrorPolicy::Raise`] the error is returned as `Err` and not
    /// recorded; under [`ErrorPolicy::Accumulate`] it is recorded and `Ok` is
    /// returned.
    pub fn add(&mut self, error: Error) -> Result<()> {
        match self.policy {
            ErrorPolicy::Raise => Err(error),
            ErrorPolicy::Accumulate => {
                tracing::warn!(kind = ?error.kind(), "{error}");
                self.errors.push(error);
                Ok(())
            }
        }
    }

    /// Route a kernel outcome through the status
    ///
    /// Returns `Ok(Some(value))` on success, `Ok(None)` when the error was
    /// accumulated, and `Err` when the policy raises.
    pub fn check<T>(&mut self, outcome: Result<T>) -> Result<Option<T>> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                self.add(error)?;
                Ok(None)
            }
        }
    }

    /// Fold another status into this one
    pub fn merge(&mut self, other: Status) -> Result<()> {
        for error in other.errors {
            self.add(error)?;
        }
        Ok(())
    }

    /// True when no error was recorded
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    /// Whether an error of the given kind was recorded
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind() == kind)
    }

    /// Human-readable description, one error per line
    pub fn description(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Convert into a `Result`, yielding the first recorded error
    pub fn into_result(self) -> Result<()> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            f.write_str("ok")
        } else {
            f.write_str(&self.description())
        }
    }
}

impl<'a> IntoIterator for &'a Status {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
