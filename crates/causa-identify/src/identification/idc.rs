//! IDC: identification of `P(y | do(x), z)` (Shpitser & Pearl, 2006).

use std::collections::BTreeSet;

use causa_core::errors::IdentificationFailure;
use causa_core::{CausalError, CausalResult, NameResolver, VarId};
use tracing::debug;

use super::id::{validate_query, Identifier};
use crate::dseparation::is_d_separated;
use crate::formula::{CausalFormula, Formula};
use crate::graph::CausalModel;

impl Identifier<'_> {
    /// Formula for `P(on | do(doing), knowing)`.
    pub fn identify_conditional(
        &self,
        on: &BTreeSet<VarId>,
        doing: &BTreeSet<VarId>,
        knowing: &BTreeSet<VarId>,
    ) -> CausalResult<Formula> {
        validate_query(self.model(), on, doing, knowing)?;
        let _span = causa_core::identification_span!(on, doing).entered();
        self.idc(on, doing, knowing).map_err(CausalError::from)
    }

    pub(crate) fn idc(
        &self,
        on: &BTreeSet<VarId>,
        doing: &BTreeSet<VarId>,
        knowing: &BTreeSet<VarId>,
    ) -> Result<Formula, IdentificationFailure> {
        let model = self.model();
        let mut x = doing.clone();
        let mut z = knowing.clone();

        // Observations that act like interventions become interventions.
        loop {
            let moved = z.iter().copied().find(|zi| {
                let single = BTreeSet::from([*zi]);
                let mut given: BTreeSet<VarId> = x.union(&z).copied().collect();
                given.remove(zi);
                is_d_separated(&model.mutilated(&x, &single), on, &single, &given)
            });
            let Some(moved) = moved else { break };
            debug!(variable = %model.name_of(moved), "observation exchanged for action");
            z.remove(&moved);
            x.insert(moved);
        }

        if z.is_empty() {
            return self.identify_unchecked(on, &x);
        }

        let joint: BTreeSet<VarId> = on.union(&z).copied().collect();
        let p_prime = self.identify_unchecked(&joint, &x).map_err(|failure| match failure {
            IdentificationFailure::Hedge(hedge) => IdentificationFailure::unidentifiable(format!(
                "conditional effect not identifiable: {}",
                hedge.message
            )),
            other => other,
        })?;
        Ok(Formula::division(p_prime.clone(), Formula::sum(on.clone(), p_prime)))
    }
}

/// Formula for `P(on | do(doing), knowing)` with the default configuration,
/// wrapped with its query.
pub fn do_calculus_with_observation(
    model: &CausalModel,
    on: &BTreeSet<VarId>,
    doing: &BTreeSet<VarId>,
    knowing: &BTreeSet<VarId>,
) -> CausalResult<CausalFormula> {
    let root = Identifier::new(model).identify_conditional(on, doing, knowing)?;
    Ok(CausalFormula::new(root, on.clone(), doing.clone(), knowing.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LatentDescriptor;
    use causa_core::BayesNet;

    fn set(ids: &[u32]) -> BTreeSet<VarId> {
        ids.iter().map(|i| VarId(*i)).collect()
    }

    fn network(arcs: &[(u32, u32)]) -> BayesNet {
        let mut bn = BayesNet::new("idc");
        for name in ["X", "Y", "Z"] {
            bn.add_variable(name, &["0", "1"]).unwrap();
        }
        for (a, b) in arcs {
            bn.add_arc(VarId(*a), VarId(*b)).unwrap();
        }
        bn
    }

    #[test]
    fn irrelevant_observation_becomes_an_intervention() {
        // X -> Y <- Z
        let model = CausalModel::from_network(&network(&[(0, 1), (2, 1)]));
        let f = do_calculus_with_observation(&model, &set(&[1]), &set(&[0]), &set(&[2])).unwrap();
        assert_eq!(f.knowing, set(&[2]));
        assert_eq!(f.root, Formula::posterior(set(&[1]), set(&[0, 2])));
    }

    #[test]
    fn downstream_observation_is_kept_as_a_ratio() {
        // X -> Y -> Z
        let model = CausalModel::from_network(&network(&[(0, 1), (1, 2)]));
        let f = do_calculus_with_observation(&model, &set(&[1]), &set(&[0]), &set(&[2])).unwrap();
        let p_prime = Formula::posterior(set(&[1, 2]), set(&[0]));
        let expected = Formula::division(p_prime.clone(), Formula::sum(set(&[1]), p_prime));
        assert_eq!(f.root, expected);
    }

    #[test]
    fn downstream_observation_of_a_bow_is_unidentifiable() {
        // A -> B -> C, A <-> B
        let mut bn = BayesNet::new("bow");
        let a = bn.add_variable("A", &["0", "1"]).unwrap();
        let b = bn.add_variable("B", &["0", "1"]).unwrap();
        let c = bn.add_variable("C", &["0", "1"]).unwrap();
        bn.add_arc(a, b).unwrap();
        bn.add_arc(b, c).unwrap();
        let model = CausalModel::new(&bn, &[LatentDescriptor::new("U", ["A", "B"])], true).unwrap();
        let err = do_calculus_with_observation(&model, &set(&[1]), &set(&[0]), &set(&[2])).unwrap_err();
        assert!(matches!(
            err,
            CausalError::Identification(IdentificationFailure::Unidentifiable(_))
        ));
    }
}
