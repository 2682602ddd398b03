use std::collections::{BTreeMap, BTreeSet};

use crate::errors::ModelError;
use crate::model::{Potential, VarId};

/// Source of observational factors.
///
/// Implementations must be faithful to the observational distribution; the
/// identification layer treats every factor they return as exact.
pub trait InferenceOracle {
    /// `P(vars)` as a potential whose scope is `vars` in id order.
    fn joint(&self, vars: &BTreeSet<VarId>) -> Result<Potential, ModelError>;

    /// `P(targets | conditions)` as a conditional table over `targets ∪ conditions`.
    /// Rows of impossible condition configurations are 0.
    fn posterior(
        &self,
        targets: &BTreeSet<VarId>,
        conditions: &BTreeSet<VarId>,
    ) -> Result<Potential, ModelError> {
        let all: BTreeSet<VarId> = targets.union(conditions).copied().collect();
        let joint = self.joint(&all)?;
        if conditions.is_empty() {
            return Ok(joint);
        }
        joint.conditional(conditions)
    }

    /// `P(targets | evidence)` as a normalized potential over `targets ∖ evidence`.
    fn posterior_with_evidence(
        &self,
        targets: &BTreeSet<VarId>,
        evidence: &BTreeMap<VarId, usize>,
    ) -> Result<Potential, ModelError> {
        let mut all = targets.clone();
        all.extend(evidence.keys().copied());
        let joint = self.joint(&all)?;
        let slice = joint.extract(evidence)?;
        slice.normalize().map_err(|_| ModelError::ImpossibleEvidence {
            details: format!("{evidence:?}"),
        })
    }
}
