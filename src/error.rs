//! Error types for the scene engine.
//!
//! Two families:
//! - `ConfigError`: a configuration object or series was applied with an impossible value.
//!   Raised synchronously, the previous state stays in effect.
//! - `EvaluationError`: the external expression evaluator failed. Recovered inside a pass.

use thiserror::Error;

/// Rejected configuration or series construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("light direction must be a non-zero finite vector")]
    ZeroLightDirection,

    #[error("screen {field} must be non-negative, got {value}")]
    NegativeDimension { field: &'static str, value: i64 },

    #[error("screen {field} too large: {value}")]
    DimensionOverflow { field: &'static str, value: i64 },

    #[error("axis dimension {index} does not exist (configured: {available})")]
    UnknownDimension { index: usize, available: usize },

    #[error("{field} must not be empty")]
    EmptyText { field: &'static str },

    #[error("table of {len} values is not a multiple of {columns} columns")]
    RaggedTable { len: usize, columns: usize },

    #[error("a point table needs at least 2 columns, got {0}")]
    TooFewColumns(usize),

    #[error("matrix grid expects {expected} values ({rows}x{cols}), got {actual}")]
    MatrixShape {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("sampling grid must have 1 or 2 free variables, got {0}")]
    GridArity(usize),

    #[error("sampling resolution for '{name}' must be at least 2, got {resolution}")]
    GridResolution { name: String, resolution: usize },
}

/// Failure reported by the expression evaluator collaborator.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("expression evaluation failed: {0}")]
    Failed(eyre::Report),

    #[error("expression produced a non-finite value")]
    NonFinite,

    #[error("expression '{expression}' produced no finite sample")]
    NoSamples { expression: String },
}

impl From<eyre::Report> for EvaluationError {
    fn from(report: eyre::Report) -> Self {
        Self::Failed(report)
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}
