use std::collections::{BTreeMap, BTreeSet};

use causa_core::{BayesNet, InferenceOracle, VarId};
use causa_identify::adjustment::BackdoorGenerator;
use causa_identify::dseparation::{is_d_separated, minimal_cond_set};
use causa_identify::graph::CausalModel;
use causa_identify::identification::identifying_intervention;
use proptest::prelude::*;

/// Binary network over `n` nodes numbered in topological order. `arcs[k]`
/// flags the k-th pair `(i, j)`, `i < j`; `probs` feeds `P(v = 0 | row)`.
fn build(n: usize, arcs: &[bool], probs: &[f64]) -> BayesNet {
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
    let stride = 1 << (n - 1);
    for j in 0..n {
        let id = VarId(j as u32);
        let rows = 1 << bn.parents(id).len();
        let values: Vec<f64> = (0..rows)
            .flat_map(|r| {
                let p = probs[j * stride + r];
                [p, 1.0 - p]
            })
            .collect();
        bn.set_cpt(id, values).unwrap();
    }
    bn
}

fn arb_network() -> impl Strategy<Value = BayesNet> {
    (2usize..=6)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec(any::<bool>(), n * (n - 1) / 2),
                prop::collection::vec(0.05f64..0.95, n << (n - 1)),
            )
        })
        .prop_map(|(n, arcs, probs)| build(n, &arcs, &probs))
}

fn intervene(bn: &BayesNet, var: VarId, value: usize) -> BayesNet {
    let mut cut = bn.clone();
    for parent in bn.parents(var).to_vec() {
        cut.erase_arc(parent, var).unwrap();
    }
    let mut point = vec![0.0; 2];
    point[value] = 1.0;
    cut.set_cpt(var, point).unwrap();
    cut
}

proptest! {
    #[test]
    fn minimal_cond_set_is_a_sound_fixpoint(bn in arb_network(), pick in any::<u64>(), target in any::<prop::sample::Index>()) {
        let model = CausalModel::from_network(&bn);
        let nodes: Vec<VarId> = bn.ids().collect();
        let x = *target.get(&nodes);
        let candidates: BTreeSet<VarId> = nodes
            .iter()
            .filter(|v| **v != x && pick & (1u64 << v.0) != 0)
            .copied()
            .collect();
        let xs = BTreeSet::from([x]);

        let kept = minimal_cond_set(model.dag(), &xs, &candidates);
        prop_assert!(kept.is_subset(&candidates));
        let dropped: BTreeSet<VarId> = candidates.difference(&kept).copied().collect();
        prop_assert!(is_d_separated(model.dag(), &xs, &dropped, &kept));
        prop_assert_eq!(minimal_cond_set(model.dag(), &xs, &kept), kept);
    }

    #[test]
    fn backdoor_sets_block_and_are_minimal(bn in arb_network(), pair in any::<(prop::sample::Index, prop::sample::Index)>()) {
        let model = CausalModel::from_network(&bn);
        let nodes: Vec<VarId> = bn.ids().collect();
        let (cause, effect) = (*pair.0.get(&nodes), *pair.1.get(&nodes));
        prop_assume!(cause != effect);

        let generator = BackdoorGenerator::new(&model, cause, effect, &BTreeSet::new());
        let probe = generator.clone();
        let sets: Vec<BTreeSet<VarId>> = generator.collect();
        let forbidden = model.descendants(&BTreeSet::from([cause]));
        let cut = model.without_outgoing(&BTreeSet::from([cause]));
        for set in &sets {
            prop_assert!(set.is_disjoint(&forbidden));
            prop_assert!(is_d_separated(&cut, &BTreeSet::from([cause]), &BTreeSet::from([effect]), set));
            for member in set {
                let mut smaller = set.clone();
                smaller.remove(member);
                prop_assert!(!probe.blocks(&smaller));
            }
        }
        for (i, a) in sets.iter().enumerate() {
            for b in &sets[i + 1..] {
                prop_assert!(a.len() <= b.len());
                prop_assert!(!a.is_subset(b));
            }
        }
    }

    #[test]
    fn id_matches_truncated_factorization_without_latents(bn in arb_network(), pair in any::<(prop::sample::Index, prop::sample::Index)>()) {
        let model = CausalModel::from_network(&bn);
        let nodes: Vec<VarId> = bn.ids().collect();
        let (cause, effect) = (*pair.0.get(&nodes), *pair.1.get(&nodes));
        prop_assume!(cause != effect);

        let formula = identifying_intervention(&model, &BTreeSet::from([effect]), &BTreeSet::from([cause])).unwrap();
        let estimate = formula.evaluate(&bn.inference()).unwrap();
        for x in 0..2 {
            let truth = intervene(&bn, cause, x).inference().joint(&BTreeSet::from([effect])).unwrap();
            for y in 0..2 {
                let fixed = BTreeMap::from([(cause, x), (effect, y)]);
                let assignment: BTreeMap<VarId, usize> = estimate
                    .vars()
                    .iter()
                    .map(|v| (*v, fixed.get(v).copied().unwrap_or(0)))
                    .collect();
                let got = estimate.get(&assignment).unwrap();
                prop_assert!((got - truth.values()[y]).abs() < 1e-9, "do({cause}={x}) {effect}={y}: {got} vs {}", truth.values()[y]);
            }
        }
    }
}
