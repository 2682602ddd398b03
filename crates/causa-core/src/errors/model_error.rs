//! Observational model and inference-oracle errors.

use super::error_code::{self, CausaErrorCode};

/// Errors raised while building a Bayesian network or querying its oracle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("duplicate variable: {name}")]
    DuplicateVariable { name: String },

    #[error("arc {from}->{to} would create a cycle: {path}")]
    CycleDetected {
        from: String,
        to: String,
        path: String,
    },

    #[error("invalid potential: {reason}")]
    InvalidPotential { reason: String },

    #[error("evidence has probability zero: {details}")]
    ImpossibleEvidence { details: String },

    #[error("malformed network descriptor: {reason}")]
    InvalidDescriptor { reason: String },
}

impl CausaErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CycleDetected { .. } => error_code::CYCLE_DETECTED,
            _ => error_code::MODEL_ERROR,
        }
    }
}
