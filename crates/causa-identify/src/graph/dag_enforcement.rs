//! Cycle rejection before every arc insertion.

use causa_core::VarId;
use petgraph::algo::astar;

use super::Dag;

/// Check whether adding `source -> target` would create a cycle.
/// If so, returns the offending cycle as `source -> target -> .. -> source`.
pub fn would_create_cycle(graph: &Dag, source: VarId, target: VarId) -> Option<Vec<VarId>> {
    // Self-loops are always cycles.
    if source == target {
        return Some(vec![source, source]);
    }
    if !graph.contains_node(source) || !graph.contains_node(target) {
        return None;
    }

    // Adding source→target closes a cycle iff target already reaches source.
    let (_, path) = astar(graph, target, |n| n == source, |_| 1_usize, |_| 0)?;
    let mut cycle = vec![source];
    cycle.extend(path);
    Some(cycle)
}

/// Whether the whole graph is acyclic.
pub fn is_acyclic(graph: &Dag) -> bool {
    !petgraph::algo::is_cyclic_directed(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_the_closing_path() {
        let g = Dag::from_edges([(VarId(0), VarId(1)), (VarId(1), VarId(2))]);
        assert_eq!(
            would_create_cycle(&g, VarId(2), VarId(0)),
            Some(vec![VarId(2), VarId(0), VarId(1), VarId(2)])
        );
        assert_eq!(would_create_cycle(&g, VarId(0), VarId(2)), None);
        assert!(would_create_cycle(&g, VarId(1), VarId(1)).is_some());
        assert!(is_acyclic(&g));
    }
}
