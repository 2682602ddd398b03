//! Pearl's three rules of the do-calculus as graphical tests.
//!
//! Each rule reads `P(y | do(x), z, w)` and names the rewrite it licenses for
//! the `z` part.

use std::collections::BTreeSet;

use causa_core::VarId;
use serde::{Deserialize, Serialize};

use crate::dseparation::is_d_separated;
use crate::graph::{traversal, CausalModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// `P(y | do(x), z, w) = P(y | do(x), w)` if `(Y ⊥ Z | X, W)` in `G_{\bar X}`.
    InsertDeleteObservation,
    /// `P(y | do(x), do(z), w) = P(y | do(x), z, w)` if `(Y ⊥ Z | X, W)` in `G_{\bar X \underline Z}`.
    ExchangeActionObservation,
    /// `P(y | do(x), do(z), w) = P(y | do(x), w)` if `(Y ⊥ Z | X, W)` in
    /// `G_{\bar X \bar{Z(W)}}`, `Z(W)` being the nodes of `Z` that are not
    /// ancestors of `W` in `G_{\bar X}`.
    InsertDeleteAction,
}

impl Rule {
    pub const ALL: [Rule; 3] = [
        Rule::InsertDeleteObservation,
        Rule::ExchangeActionObservation,
        Rule::InsertDeleteAction,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::InsertDeleteObservation => "Insertion/deletion of observations",
            Rule::ExchangeActionObservation => "Action/observation exchange",
            Rule::InsertDeleteAction => "Insertion/deletion of actions",
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Rule::InsertDeleteObservation => 1,
            Rule::ExchangeActionObservation => 2,
            Rule::InsertDeleteAction => 3,
        }
    }

    /// Whether the rule applies to `P(y | do(x), z, w)` (rule 1) or
    /// `P(y | do(x), do(z), w)` (rules 2 and 3).
    pub fn applies(
        &self,
        model: &CausalModel,
        y: &BTreeSet<VarId>,
        x: &BTreeSet<VarId>,
        z: &BTreeSet<VarId>,
        w: &BTreeSet<VarId>,
    ) -> bool {
        let given: BTreeSet<VarId> = x.union(w).copied().collect();
        let graph = match self {
            Rule::InsertDeleteObservation => model.without_incoming(x),
            Rule::ExchangeActionObservation => model.mutilated(x, z),
            Rule::InsertDeleteAction => {
                let g_bar_x = model.without_incoming(x);
                let w_ancestors = traversal::ancestors(&g_bar_x, w);
                let z_w: BTreeSet<VarId> = z.difference(&w_ancestors).copied().collect();
                let no_incoming: BTreeSet<VarId> = x.union(&z_w).copied().collect();
                model.without_incoming(&no_incoming)
            }
        };
        is_d_separated(&graph, y, z, &given)
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule {} ({})", self.number(), self.name())
    }
}
