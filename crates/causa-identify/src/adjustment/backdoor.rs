//! Backdoor adjustment sets.

use std::collections::BTreeSet;

use causa_core::{NameResolver, VarId};
use tracing::debug;

use super::combinations::SubsetSearch;
use crate::dseparation::is_d_separated;
use crate::graph::{CausalModel, Dag};

/// Lazily yields the minimal backdoor adjustment sets for `cause → effect`.
///
/// Sets come by increasing size, lexicographically by id within a size, and a
/// superset of a yielded set is never yielded. When the empty set already
/// blocks every backdoor path it is the only set produced.
#[derive(Debug, Clone)]
pub struct BackdoorGenerator<'a> {
    model: &'a CausalModel,
    cause: VarId,
    effect: VarId,
    /// The model without the arcs leaving `cause`.
    graph: Dag,
    search: SubsetSearch,
}

impl<'a> BackdoorGenerator<'a> {
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
        let ends = BTreeSet::from([cause, effect]);
        let forbidden = model.descendants(&BTreeSet::from([cause]));
        let pool: BTreeSet<VarId> = model
            .ancestors(&ends)
            .into_iter()
            .filter(|n| {
                !ends.contains(n)
                    && !forbidden.contains(n)
                    && !model.is_latent(*n)
                    && !excluded.contains(n)
            })
            .collect();
        debug!(
            cause = %model.name_of(cause),
            effect = %model.name_of(effect),
            pool = pool.len(),
            "backdoor search"
        );
        Self {
            graph: model.without_outgoing(&BTreeSet::from([cause])),
            search: SubsetSearch::new(pool, 0, max_set_size),
            model,
            cause,
            effect,
        }
    }

    pub fn model(&self) -> &'a CausalModel {
        self.model
    }

    /// Start the enumeration over.
    pub fn restart(&mut self) {
        self.search.restart(0);
    }

    /// Whether `set` blocks every backdoor path from `cause` to `effect`.
    pub fn blocks(&self, set: &BTreeSet<VarId>) -> bool {
        is_d_separated(
            &self.graph,
            &BTreeSet::from([self.cause]),
            &BTreeSet::from([self.effect]),
            set,
        )
    }
}

impl Iterator for BackdoorGenerator<'_> {
    type Item = BTreeSet<VarId>;

    fn next(&mut self) -> Option<BTreeSet<VarId>> {
        while let Some(candidate) = self.search.next_candidate() {
            if self.blocks(&candidate) {
                self.search.accept(candidate.clone());
                return Some(candidate);
            }
        }
        None
    }
}
