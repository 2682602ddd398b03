//! d-separation through the moralized ancestral graph (Lauritzen's criterion).
//!
//! `xs ⊥ ys | zs` holds in a DAG iff, in the moral graph of the ancestral set
//! of `xs ∪ ys ∪ zs`, every path from `xs` to `ys` goes through `zs`.
//! Latent nodes are ordinary unobserved nodes here.

use std::collections::{BTreeSet, VecDeque};

use causa_core::VarId;
use petgraph::graphmap::UnGraphMap;
use petgraph::Direction;

use crate::graph::{traversal, Dag};

/// Undirected moral graph.
pub type MoralGraph = UnGraphMap<VarId, ()>;

/// `nodes` and all their ancestors in `graph`.
pub fn ancestral_set(graph: &Dag, nodes: &BTreeSet<VarId>) -> BTreeSet<VarId> {
    traversal::ancestors(graph, nodes)
}

/// Moral graph of the subgraph induced by `nodes`: arcs lose their direction
/// and parents sharing a child are married.
pub fn moralize(graph: &Dag, nodes: &BTreeSet<VarId>) -> MoralGraph {
    let mut moral = MoralGraph::new();
    for node in nodes {
        moral.add_node(*node);
    }
    for node in nodes {
        if !graph.contains_node(*node) {
            continue;
        }
        let parents: Vec<VarId> = graph
            .neighbors_directed(*node, Direction::Incoming)
            .filter(|p| nodes.contains(p))
            .collect();
        for (i, parent) in parents.iter().enumerate() {
            moral.add_edge(*parent, *node, ());
            for other in &parents[i + 1..] {
                moral.add_edge(*parent, *other, ());
            }
        }
    }
    moral
}

/// Whether `xs` and `ys` are d-separated by `zs` in `graph`.
///
/// Members of `zs` are ignored in `xs` and `ys`. An empty side is trivially
/// separated; a node shared by both sides never is.
pub fn is_d_separated(
    graph: &Dag,
    xs: &BTreeSet<VarId>,
    ys: &BTreeSet<VarId>,
    zs: &BTreeSet<VarId>,
) -> bool {
    let xs: BTreeSet<VarId> = xs.difference(zs).copied().collect();
    let ys: BTreeSet<VarId> = ys.difference(zs).copied().collect();
    if xs.is_empty() || ys.is_empty() {
        return true;
    }
    if !xs.is_disjoint(&ys) {
        return false;
    }

    let mut relevant: BTreeSet<VarId> = xs.union(&ys).copied().collect();
    relevant.extend(zs.iter().copied());
    let moral = moralize(graph, &ancestral_set(graph, &relevant));

    let mut seen = xs.clone();
    let mut queue: VecDeque<VarId> = xs.iter().copied().collect();
    while let Some(node) = queue.pop_front() {
        for next in moral.neighbors(node) {
            if zs.contains(&next) || !seen.insert(next) {
                continue;
            }
            if ys.contains(&next) {
                return false;
            }
            queue.push_back(next);
        }
    }
    true
}
