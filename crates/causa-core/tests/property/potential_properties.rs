use std::collections::BTreeSet;

use causa_core::{Potential, VarId};
use proptest::prelude::*;

/// A strictly positive potential over 1..=3 variables of cardinality 2 or 3.
fn arb_potential() -> impl Strategy<Value = Potential> {
    prop::collection::vec(2usize..=3, 1..=3)
        .prop_flat_map(|cards| {
            let size: usize = cards.iter().product();
            (Just(cards), prop::collection::vec(0.01f64..1.0, size))
        })
        .prop_map(|(cards, values)| {
            let scope: Vec<(VarId, usize)> = cards
                .iter()
                .enumerate()
                .map(|(i, c)| (VarId(i as u32), *c))
                .collect();
            Potential::from_values(&scope, values).unwrap()
        })
}

proptest! {
    #[test]
    fn marginalization_preserves_mass(p in arb_potential(), mask in any::<u8>()) {
        let out: BTreeSet<VarId> = p.vars().iter().filter(|v| mask & (1 << v.0) != 0).copied().collect();
        let m = p.marginalize(&out);
        prop_assert!((m.sum() - p.sum()).abs() < 1e-9);
        prop_assert!(m.var_set().is_disjoint(&out));
    }

    #[test]
    fn reorder_keeps_every_cell(p in arb_potential()) {
        let mut order = p.vars().to_vec();
        order.reverse();
        let r = p.reorder(&order).unwrap();
        prop_assert_eq!(r.vars(), order.as_slice());
        for idx in p.assignments() {
            let assignment = p.vars().iter().copied().zip(idx.iter().copied()).collect();
            prop_assert_eq!(p.get(&assignment), r.get(&assignment));
        }
    }

    #[test]
    fn conditional_rows_sum_to_one(p in arb_potential()) {
        let first = BTreeSet::from([p.vars()[0]]);
        let conditions: BTreeSet<VarId> = p.var_set().difference(&first).copied().collect();
        let table = p.conditional(&conditions).unwrap();
        let rows = table.marginalize(&first);
        for v in rows.values() {
            prop_assert!((v - 1.0).abs() < 1e-9);
        }
    }
}
