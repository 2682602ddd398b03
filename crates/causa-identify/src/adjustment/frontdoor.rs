//! Front-door adjustment sets.

use std::collections::BTreeSet;

use causa_core::{NameResolver, VarId};
use tracing::debug;

use super::combinations::SubsetSearch;
use crate::dseparation::is_d_separated;
use crate::graph::{traversal, CausalModel, Dag};

/// Lazily yields the minimal front-door sets for `cause → effect`, in the
/// same order and with the same superset pruning as
/// [`super::BackdoorGenerator`].
#[derive(Debug, Clone)]
pub struct FrontdoorGenerator<'a> {
    model: &'a CausalModel,
    cause: VarId,
    effect: VarId,
    /// The model without the arcs leaving `cause`.
    graph: Dag,
    search: SubsetSearch,
}

impl<'a> FrontdoorGenerator<'a> {
    pub fn new(model: &'a CausalModel, cause: VarId, effect: VarId, excluded: &BTreeSet<VarId>) -> Self {
        Self::with_max_size(model, cause, effect, excluded, None)
    }

    pub fn with_max_size(
        model: &'a CausalModel,
        cause: VarId,
        effect: VarId,
        excluded: &BTreeSet<VarId>,
        max_set_size: Option<usize>,
    ) -> Self {
        let downstream = model.descendants(&BTreeSet::from([cause]));
        let upstream = model.ancestors(&BTreeSet::from([effect]));
        let pool: BTreeSet<VarId> = downstream
            .intersection(&upstream)
            .filter(|n| {
                **n != cause && **n != effect && !model.is_latent(**n) && !excluded.contains(n)
            })
            .copied()
            .collect();
        debug!(
            cause = %model.name_of(cause),
            effect = %model.name_of(effect),
            pool = pool.len(),
            "frontdoor search"
        );
        Self {
            graph: model.without_outgoing(&BTreeSet::from([cause])),
            search: SubsetSearch::new(pool, 1, max_set_size),
            model,
            cause,
            effect,
        }
    }

    pub fn restart(&mut self) {
        self.search.restart(1);
    }

    /// Whether `set` satisfies the three front-door conditions.
    pub fn admits(&self, set: &BTreeSet<VarId>) -> bool {
        let dag = self.model.dag();
        let cause = BTreeSet::from([self.cause]);
        let effect = BTreeSet::from([self.effect]);

        // Every directed path cause ⇝ effect crosses the set.
        if traversal::has_directed_path_avoiding(dag, self.cause, self.effect, set) {
            return false;
        }
        // No open backdoor path from cause to the set.
        if !is_d_separated(&self.graph, &cause, set, &BTreeSet::new()) {
            return false;
        }
        // Every backdoor path from the set to effect is blocked by cause.
        let cut = self.model.without_outgoing(set);
        is_d_separated(&cut, set, &effect, &cause)
    }
}

impl Iterator for FrontdoorGenerator<'_> {
    type Item = BTreeSet<VarId>;

    fn next(&mut self) -> Option<BTreeSet<VarId>> {
        while let Some(candidate) = self.search.next_candidate() {
            if self.admits(&candidate) {
                self.search.accept(candidate.clone());
                return Some(candidate);
            }
        }
        None
    }
}
