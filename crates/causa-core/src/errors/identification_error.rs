//! Identification failures. These are expected outcomes, not misuse:
//! callers exploring many queries receive them as values.

use std::collections::BTreeSet;

use crate::model::VarId;

use super::error_code::{self, CausaErrorCode};

/// A hedge: a pair of confounded structures proving that the effect is not
/// identifiable from the observational distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HedgeException {
    pub message: String,
    /// Observable nodes of the larger structure of the hedge.
    pub observables: BTreeSet<VarId>,
    /// The confounded component sitting inside `observables` that cannot be
    /// separated from the intervention.
    pub witness: BTreeSet<VarId>,
}

/// Non-identifiability without an exhibited hedge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnidentifiableException {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentificationFailure {
    #[error("hedge found: {}", .0.message)]
    Hedge(HedgeException),

    #[error("not identifiable: {}", .0.message)]
    Unidentifiable(UnidentifiableException),
}

impl IdentificationFailure {
    pub fn hedge(
        message: impl Into<String>,
        observables: BTreeSet<VarId>,
        witness: BTreeSet<VarId>,
    ) -> Self {
        Self::Hedge(HedgeException {
            message: message.into(),
            observables,
            witness,
        })
    }

    pub fn unidentifiable(message: impl Into<String>) -> Self {
        Self::Unidentifiable(UnidentifiableException {
            message: message.into(),
        })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Hedge(h) => &h.message,
            Self::Unidentifiable(u) => &u.message,
        }
    }

    pub fn as_hedge(&self) -> Option<&HedgeException> {
        match self {
            Self::Hedge(h) => Some(h),
            Self::Unidentifiable(_) => None,
        }
    }
}

impl CausaErrorCode for IdentificationFailure {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Hedge(_) => error_code::HEDGE,
            Self::Unidentifiable(_) => error_code::UNIDENTIFIABLE,
        }
    }
}
