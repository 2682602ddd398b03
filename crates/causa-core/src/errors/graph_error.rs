//! Causal graph errors: structural misuse and cycle rejection.

use super::error_code::{self, CausaErrorCode};

/// Errors raised while building or editing a causal model.
/// These indicate caller misuse and are never recoverable outcomes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown variable in causal model: {name}")]
    UnknownVariable { name: String },

    #[error("invalid latent descriptor {name}: {reason}")]
    InvalidLatent { name: String, reason: String },

    #[error("cycle detected in causal graph: {path}")]
    CycleDetected { path: String },

    #[error("invalid arc {from}->{to}: {reason}")]
    InvalidArc {
        from: String,
        to: String,
        reason: String,
    },
}

impl CausaErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CycleDetected { .. } => error_code::CYCLE_DETECTED,
            _ => error_code::STRUCTURAL_ERROR,
        }
    }
}
