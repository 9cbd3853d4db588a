//! Boundary to the external expression evaluator.
//!
//! The engine never interprets expressions itself. A `MathSeries` hands the opaque
//! `Expression` and a sample point to an `ExpressionEvaluator` and gets a number back.

use crate::error::EvaluationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an expression owned by the evaluator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expression(String);

impl Expression {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Evaluates an expression at one sample point.
///
/// `point` holds one value per free variable, in the order of the sampling grid.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, expression: &Expression, point: &[f64]) -> Result<f64, EvaluationError>;
}

/// Adapter turning a closure into an evaluator.
pub struct FnEvaluator<F>(F);

impl<F> FnEvaluator<F>
where
    F: Fn(&Expression, &[f64]) -> eyre::Result<f64> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> ExpressionEvaluator for FnEvaluator<F>
where
    F: Fn(&Expression, &[f64]) -> eyre::Result<f64> + Send + Sync,
{
    fn evaluate(&self, expression: &Expression, point: &[f64]) -> Result<f64, EvaluationError> {
        let value = (self.0)(expression, point)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::NonFinite)
        }
    }
}
