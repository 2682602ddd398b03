//! Numeric evaluation errors.

use super::error_code::{self, CausaErrorCode};
use super::ModelError;

/// Errors raised while evaluating a formula against an inference oracle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("division by zero at {assignment}")]
    DivisionByZero { assignment: String },

    #[error("inference failed: {0}")]
    Model(#[from] ModelError),
}

impl CausaErrorCode for EvaluationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DivisionByZero { .. } => error_code::EVALUATION_ERROR,
            Self::Model(e) => e.error_code(),
        }
    }
}
