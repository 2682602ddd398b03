//! Top-level error aggregating every subsystem via `From` conversions.

use super::error_code::{self, CausaErrorCode};
use super::{ConfigError, EvaluationError, GraphError, IdentificationFailure, ModelError};

#[derive(Debug, thiserror::Error)]
pub enum CausalError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Identification(#[from] IdentificationFailure),

    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },
}

pub type CausalResult<T> = Result<T, CausalError>;

impl CausaErrorCode for CausalError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Model(e) => e.error_code(),
            Self::Graph(e) => e.error_code(),
            Self::Identification(e) => e.error_code(),
            Self::Evaluation(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::InvalidQuery { .. } => error_code::INVALID_QUERY,
        }
    }
}
