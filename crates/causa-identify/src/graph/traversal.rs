//! Reachability over a [`Dag`]: ancestors, descendants, directed paths.

use std::collections::{BTreeSet, VecDeque};

use causa_core::VarId;
use petgraph::Direction;

use super::Dag;

/// `nodes` plus every node reaching them. Nodes absent from `graph` are kept as-is.
pub fn ancestors(graph: &Dag, nodes: &BTreeSet<VarId>) -> BTreeSet<VarId> {
    closure(graph, nodes, Direction::Incoming)
}

/// `nodes` plus every node they reach.
pub fn descendants(graph: &Dag, nodes: &BTreeSet<VarId>) -> BTreeSet<VarId> {
    closure(graph, nodes, Direction::Outgoing)
}

fn closure(graph: &Dag, nodes: &BTreeSet<VarId>, direction: Direction) -> BTreeSet<VarId> {
    let mut seen = nodes.clone();
    let mut queue: VecDeque<VarId> = nodes.iter().copied().collect();
    while let Some(node) = queue.pop_front() {
        if !graph.contains_node(node) {
            continue;
        }
        for next in graph.neighbors_directed(node, direction) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Whether a directed path `from ⇝ to` exists that avoids every node of `blocked`.
pub fn has_directed_path_avoiding(
    graph: &Dag,
    from: VarId,
    to: VarId,
    blocked: &BTreeSet<VarId>,
) -> bool {
    if !graph.contains_node(from) {
        return false;
    }
    let mut seen = BTreeSet::from([from]);
    let mut queue = VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            if next == to {
                return true;
            }
            if !blocked.contains(&next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}

/// Copy of `graph` without the arcs entering `no_incoming` and without the
/// arcs leaving `no_outgoing`: `G_{\bar X \underline Z}`.
pub fn mutilate(graph: &Dag, no_incoming: &BTreeSet<VarId>, no_outgoing: &BTreeSet<VarId>) -> Dag {
    let mut out = Dag::new();
    for node in graph.nodes() {
        out.add_node(node);
    }
    for (from, to, _) in graph.all_edges() {
        if !no_incoming.contains(&to) && !no_outgoing.contains(&from) {
            out.add_edge(from, to, ());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Dag {
        // 0 -> 1 -> 3, 0 -> 2 -> 3
        Dag::from_edges([
            (VarId(0), VarId(1)),
            (VarId(0), VarId(2)),
            (VarId(1), VarId(3)),
            (VarId(2), VarId(3)),
        ])
    }

    #[test]
    fn ancestors_and_descendants_are_inclusive() {
        let g = diamond();
        assert_eq!(ancestors(&g, &BTreeSet::from([VarId(1)])), BTreeSet::from([VarId(0), VarId(1)]));
        assert_eq!(descendants(&g, &BTreeSet::from([VarId(2)])), BTreeSet::from([VarId(2), VarId(3)]));
    }

    #[test]
    fn blocked_paths_need_every_route_cut() {
        let g = diamond();
        let one = BTreeSet::from([VarId(1)]);
        let both = BTreeSet::from([VarId(1), VarId(2)]);
        assert!(has_directed_path_avoiding(&g, VarId(0), VarId(3), &one));
        assert!(!has_directed_path_avoiding(&g, VarId(0), VarId(3), &both));
    }

    #[test]
    fn mutilation_removes_selected_arcs_only() {
        let g = diamond();
        let cut = mutilate(&g, &BTreeSet::from([VarId(3)]), &BTreeSet::from([VarId(0)]));
        assert_eq!(cut.edge_count(), 0);
        assert_eq!(cut.node_count(), 4);
        let partial = mutilate(&g, &BTreeSet::from([VarId(1)]), &BTreeSet::new());
        assert_eq!(partial.edge_count(), 3);
    }
}
