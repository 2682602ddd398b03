use std::collections::BTreeSet;

use causa_core::{BayesNet, VarId};
use causa_identify::graph::dag_enforcement::is_acyclic;
use causa_identify::graph::{CausalModel, LatentDescriptor};
use proptest::prelude::*;

/// Binary network over `n` nodes numbered in topological order; `arcs[k]`
/// flags the k-th pair `(i, j)`, `i < j`.
fn build(n: usize, arcs: &[bool]) -> BayesNet {
    let mut bn = BayesNet::new("random");
    for i in 0..n {
        bn.add_variable(&format!("V{i}"), &["0", "1"]).unwrap();
    }
    let mut k = 0;
    for j in 0..n {
        for i in 0..j {
            if arcs[k] {
                bn.add_arc(VarId(i as u32), VarId(j as u32)).unwrap();
            }
            k += 1;
        }
    }
    bn
}

/// A network with up to three latents, each confounding two distinct nodes.
fn arb_confounded() -> impl Strategy<Value = (BayesNet, Vec<LatentDescriptor>)> {
    (2usize..=6)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec(any::<bool>(), n * (n - 1) / 2),
                prop::collection::vec((0..n, 0..n), 0..=3),
            )
        })
        .prop_map(|(n, arcs, pairs)| {
            let latents = pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .enumerate()
                .map(|(k, (a, b))| LatentDescriptor::new(&format!("U{k}"), [format!("V{a}"), format!("V{b}")]))
                .collect();
            (build(n, &arcs), latents)
        })
}

proptest! {
    #[test]
    fn keeping_arcs_preserves_every_observed_arc((bn, latents) in arb_confounded()) {
        let model = CausalModel::new(&bn, &latents, true).unwrap();
        let arcs: BTreeSet<(VarId, VarId)> = model.arcs().into_iter().collect();
        for arc in bn.arcs() {
            prop_assert!(arcs.contains(&arc), "{arc:?} lost");
        }
    }

    #[test]
    fn construction_is_deterministic((bn, latents) in arb_confounded(), keep in any::<bool>()) {
        let first = CausalModel::new(&bn, &latents, keep).unwrap();
        let second = CausalModel::new(&bn, &latents, keep).unwrap();
        prop_assert_eq!(first.arcs(), second.arcs());
        prop_assert_eq!(first.bi_arcs(), second.bi_arcs());
        prop_assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn latents_replace_exactly_their_sibling_arcs((bn, latents) in arb_confounded()) {
        let model = CausalModel::new(&bn, &latents, false).unwrap();
        prop_assert!(is_acyclic(model.dag()));
        let bi = model.bi_arcs();
        for (a, b) in bn.arcs() {
            let confounded = bi.contains(&(a.min(b), a.max(b)));
            prop_assert_eq!(model.exists_arc(a, b), !confounded);
        }
    }
}
