//! Confounded components ("districts"): observables linked by bidirected arcs.

use std::collections::{BTreeMap, BTreeSet};

use causa_core::VarId;

/// Partition `nodes` into maximal sets connected through `bi_arcs`.
/// Components are ordered by their smallest member.
pub fn components(
    nodes: &BTreeSet<VarId>,
    bi_arcs: impl IntoIterator<Item = (VarId, VarId)>,
) -> Vec<BTreeSet<VarId>> {
    let mut parent: BTreeMap<VarId, VarId> = nodes.iter().map(|n| (*n, *n)).collect();

    fn find(parent: &mut BTreeMap<VarId, VarId>, node: VarId) -> VarId {
        let mut root = node;
        while parent[&root] != root {
            root = parent[&root];
        }
        // Path compression.
        let mut cursor = node;
        while parent[&cursor] != root {
            let next = parent[&cursor];
            parent.insert(cursor, root);
            cursor = next;
        }
        root
    }

    for (a, b) in bi_arcs {
        if !parent.contains_key(&a) || !parent.contains_key(&b) {
            continue;
        }
        let ra = find(&mut parent, a);
        let rb = find(&mut parent, b);
        if ra != rb {
            // Smallest id becomes the root so the output order is stable.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            parent.insert(hi, lo);
        }
    }

    let mut groups: BTreeMap<VarId, BTreeSet<VarId>> = BTreeMap::new();
    for node in nodes {
        let root = find(&mut parent, *node);
        groups.entry(root).or_default().insert(*node);
    }
    groups.into_values().collect()
}
