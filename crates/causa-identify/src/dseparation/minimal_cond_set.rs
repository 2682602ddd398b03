use std::collections::{BTreeSet, VecDeque};

use causa_core::VarId;

use super::d_separation::{ancestral_set, moralize};
use crate::graph::Dag;

/// Smallest subset of `candidates` that screens `target` off from the rest.
///
/// The result keeps `P(target | candidates) = P(target | result)`: `target`
/// is d-separated from the dropped candidates given the result. Reduction is
/// repeated until nothing more can be dropped, so applying it again is a no-op.
/// When `target` overlaps `candidates` the overlap is returned as is.
pub fn minimal_cond_set(
    graph: &Dag,
    target: &BTreeSet<VarId>,
    candidates: &BTreeSet<VarId>,
) -> BTreeSet<VarId> {
    let overlap: BTreeSet<VarId> = target.intersection(candidates).copied().collect();
    if !overlap.is_empty() {
        return overlap;
    }
    let mut current = candidates.clone();
    loop {
        let reduced = reduce_once(graph, target, &current);
        if reduced.len() == current.len() {
            return reduced;
        }
        current = reduced;
    }
}

/// Candidates reachable from `target` in the moral ancestral graph without
/// walking through another candidate.
fn reduce_once(
    graph: &Dag,
    target: &BTreeSet<VarId>,
    candidates: &BTreeSet<VarId>,
) -> BTreeSet<VarId> {
    let mut relevant = target.clone();
    relevant.extend(candidates.iter().copied());
    let moral = moralize(graph, &ancestral_set(graph, &relevant));

    let mut kept = BTreeSet::new();
    let mut seen = target.clone();
    let mut queue: VecDeque<VarId> = target.iter().copied().collect();
    while let Some(node) = queue.pop_front() {
        for next in moral.neighbors(node) {
            if !seen.insert(next) {
                continue;
            }
            if candidates.contains(&next) {
                kept.insert(next);
            } else {
                queue.push_back(next);
            }
        }
    }
    kept
}
