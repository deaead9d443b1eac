//! Error types for analytics algorithms
//!
//! Provides a unified error type for all analytics crates. Every error maps to a
//! stable [`ErrorKind`] and can describe itself through typed [`ErrorDetail`]s,
//! which is what the [`Status`](crate::status::Status) channel and the binding
//! layer expose to callers.

use crate::algorithm::ComputeMode;
use crate::cpu::CpuFeatureLevel;
use crate::numeric::Precision;
use std::fmt;
use thiserror::Error;

/// Core error type for analytics operations
#[derive(Error, Debug)]
pub enum Error {
    /// No kernel registered for the requested combination at any usable CPU level
    #[error("Kernel not available: no {mode} kernel for {precision} precision, method {method}, at or below CPU level {level}")]
    KernelNotAvailable {
        precision: Precision,
        method: String,
        mode: ComputeMode,
        level: CpuFeatureLevel,
    },

    /// Input table or collection has no content
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A required input was not provided
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Finalization requested before anything was accumulated
    #[error("Empty partial result: finalize_compute called before any successful compute")]
    EmptyPartialResult,

    /// Shapes of inputs, parameters or partial results disagree
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        context: String,
    },

    /// Numerical failure reported by a kernel (singular system, rank deficiency, ...)
    #[error("Numeric failure: {0}")]
    Numeric(String),

    /// Invalid parameter provided to an algorithm
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Memory allocation or workspace error
    #[error("Memory error: {0}")]
    Memory(String),

    /// Feature not available on this build or CPU
    #[error("Feature not available: {0}")]
    FeatureNotAvailable(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Stable identifier of an error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    KernelNotAvailable,
    EmptyInput,
    MissingInput,
    EmptyPartialResult,
    DimensionMismatch,
    Numeric,
    InvalidParameter,
    Allocation,
    FeatureNotAvailable,
    Io,
    Other,
}

impl ErrorKind {
    /// Integer code used across the binding layer
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::KernelNotAvailable => 1,
            ErrorKind::EmptyInput => 2,
            ErrorKind::MissingInput => 3,
            ErrorKind::EmptyPartialResult => 4,
            ErrorKind::DimensionMismatch => 5,
            ErrorKind::Numeric => 6,
            ErrorKind::InvalidParameter => 7,
            ErrorKind::Allocation => 8,
            ErrorKind::FeatureNotAvailable => 9,
            ErrorKind::Io => 10,
            ErrorKind::Other => 99,
        }
    }
}

/// Typed payload of an error detail
#[derive(Debug, Clone, PartialEq)]
pub enum DetailValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::Int(v) => write!(f, "{v}"),
            DetailValue::Float(v) => write!(f, "{v}"),
            DetailValue::Text(v) => f.write_str(v),
        }
    }
}

/// Named, typed detail attached to an error
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub name: &'static str,
    pub value: DetailValue,
}

impl ErrorDetail {
    pub fn int(name: &'static str, value: usize) -> Self {
        Self {
            name,
            value: DetailValue::Int(value as i64),
        }
    }

    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: DetailValue::Text(value.into()),
        }
    }

    pub fn float(name: &'static str, value: f64) -> Self {
        Self {
            name,
            value: DetailValue::Float(value),
        }
    }
}

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input
    pub fn empty_input(what: &str) -> Self {
        Self::EmptyInput(format!("{what} contains no rows"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::DimensionMismatch {
            expected,
            actual,
            context: context.to_string(),
        }
    }

    /// Create an error for a singular or indefinite system
    pub fn singular(context: &str) -> Self {
        Self::Numeric(format!("{context} is singular or not positive definite"))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Numeric(format!("{context} contains NaN or infinite values"))
    }

    /// Create an error for a partial result built by another method
    pub fn foreign_partial(expected: &str) -> Self {
        Self::InvalidParameter(format!(
            "partial result was not produced by a {expected} kernel"
        ))
    }

    /// Stable category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::KernelNotAvailable { .. } => ErrorKind::KernelNotAvailable,
            Error::EmptyInput(_) => ErrorKind::EmptyInput,
            Error::MissingInput(_) => ErrorKind::MissingInput,
            Error::EmptyPartialResult => ErrorKind::EmptyPartialResult,
            Error::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Error::Numeric(_) => ErrorKind::Numeric,
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Error::Memory(_) => ErrorKind::Allocation,
            Error::FeatureNotAvailable(_) => ErrorKind::FeatureNotAvailable,
            Error::Io(_) => ErrorKind::Io,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Typed details describing this error
    pub fn details(&self) -> Vec<ErrorDetail> {
        match self {
            Error::KernelNotAvailable {
                precision,
                method,
                mode,
                level,
            } => vec![
                ErrorDetail::text("precision", precision.to_string()),
                ErrorDetail::text("method", method.clone()),
                ErrorDetail::text("mode", mode.to_string()),
                ErrorDetail::text("cpu", level.to_string()),
            ],
            Error::DimensionMismatch {
                expected,
                actual,
                context,
            } => vec![
                ErrorDetail::int("expected", *expected),
                ErrorDetail::int("actual", *actual),
                ErrorDetail::text("context", context.clone()),
            ],
            Error::EmptyPartialResult => Vec::new(),
            Error::EmptyInput(msg)
            | Error::MissingInput(msg)
            | Error::Numeric(msg)
            | Error::InvalidParameter(msg)
            | Error::Memory(msg)
            | Error::FeatureNotAvailable(msg) => vec![ErrorDetail::text("message", msg.clone())],
            Error::Io(e) => vec![ErrorDetail::text("message", e.to_string())],
            Error::Other(e) => vec![ErrorDetail::text("message", e.to_string())],
        }
    }
}
