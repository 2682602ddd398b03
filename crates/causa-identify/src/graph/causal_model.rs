//! The causal model: the observational network plus declared latent confounders.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use causa_core::errors::GraphError;
use causa_core::{BayesNet, NameResolver, VarId};
use petgraph::Direction;
use tracing::{debug, info};

use super::latent::{Latent, LatentDescriptor};
use super::{dag_enforcement, districts, traversal, Dag};

/// A causal DAG over the observables of a [`BayesNet`] augmented with latent
/// confounders.
///
/// The arc set is owned by the model: after construction it no longer tracks
/// the network's arcs, so what-if edits do not touch the observational
/// distribution used for evaluation.
#[derive(Debug, Clone)]
pub struct CausalModel {
    observational: BayesNet,
    dag: Dag,
    latents: BTreeMap<VarId, Latent>,
}

impl CausalModel {
    /// Build a model from `bn` and `descriptors`.
    ///
    /// Unless `keep_arcs` is set, any arc between two children of the same
    /// latent is erased: the latent replaces the direct dependency.
    pub fn new(
        bn: &BayesNet,
        descriptors: &[LatentDescriptor],
        keep_arcs: bool,
    ) -> Result<Self, GraphError> {
        let mut model = Self::from_network(bn);
        let mut next_id = bn.size() as u32;
        let mut taken: BTreeSet<&str> = bn.variables().iter().map(|v| v.name.as_str()).collect();

        for descriptor in descriptors {
            if !taken.insert(descriptor.name.as_str()) {
                return Err(GraphError::InvalidLatent {
                    name: descriptor.name.clone(),
                    reason: "name already used".to_string(),
                });
            }
            let mut children = BTreeSet::new();
            for child in &descriptor.children {
                let id = bn.id_from_name(child).ok_or_else(|| GraphError::UnknownVariable {
                    name: child.clone(),
                })?;
                children.insert(id);
            }
            if children.len() < 2 {
                return Err(GraphError::InvalidLatent {
                    name: descriptor.name.clone(),
                    reason: "a latent confounder needs at least two distinct children".to_string(),
                });
            }

            let latent = Latent {
                name: descriptor.name.clone(),
                children,
            };
            if !keep_arcs {
                let pairs: Vec<(VarId, VarId)> = latent.pairs().collect();
                for (a, b) in pairs {
                    if model.dag.remove_edge(a, b).is_some() || model.dag.remove_edge(b, a).is_some() {
                        debug!(latent = %latent.name, a = %model.name_of(a), b = %model.name_of(b), "arc replaced by latent");
                    }
                }
            }

            let id = VarId(next_id);
            next_id += 1;
            model.dag.add_node(id);
            for child in &latent.children {
                model.dag.add_edge(id, *child, ());
            }
            model.latents.insert(id, latent);
        }

        info!(
            network = bn.name(),
            observables = bn.size(),
            latents = model.latents.len(),
            arcs = model.dag.edge_count(),
            "causal model built"
        );
        Ok(model)
    }

    /// A model without latent confounders, mirroring the network's arcs.
    pub fn from_network(bn: &BayesNet) -> Self {
        let mut dag = Dag::new();
        for id in bn.ids() {
            dag.add_node(id);
        }
        for (from, to) in bn.arcs() {
            dag.add_edge(from, to, ());
        }
        Self {
            observational: bn.clone(),
            dag,
            latents: BTreeMap::new(),
        }
    }

    /// The observational network this model was built from.
    pub fn observational(&self) -> &BayesNet {
        &self.observational
    }

    pub fn dag(&self) -> &Dag {
        &self.dag
    }

    pub fn latents(&self) -> &BTreeMap<VarId, Latent> {
        &self.latents
    }

    pub fn latent_ids(&self) -> BTreeSet<VarId> {
        self.latents.keys().copied().collect()
    }

    pub fn is_latent(&self, id: VarId) -> bool {
        self.latents.contains_key(&id)
    }

    /// Observable nodes of this model (all nodes that are not latents).
    pub fn observables(&self) -> BTreeSet<VarId> {
        self.dag.nodes().filter(|n| !self.is_latent(*n)).collect()
    }

    pub fn contains(&self, id: VarId) -> bool {
        self.dag.contains_node(id)
    }

    /// Resolve an observable by name.
    pub fn id_from_name(&self, name: &str) -> Option<VarId> {
        self.observational
            .id_from_name(name)
            .filter(|id| self.dag.contains_node(*id))
    }

    pub fn require(&self, name: &str) -> Result<VarId, GraphError> {
        self.id_from_name(name)
            .ok_or_else(|| GraphError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Resolve several observables by name.
    pub fn require_all<S: AsRef<str>>(
        &self,
        names: impl IntoIterator<Item = S>,
    ) -> Result<BTreeSet<VarId>, GraphError> {
        names.into_iter().map(|n| self.require(n.as_ref())).collect()
    }

    /// Every node name, latents included, keyed by id.
    pub fn names(&self) -> BTreeMap<VarId, String> {
        self.dag.nodes().map(|n| (n, self.name_of(n))).collect()
    }

    pub fn parents(&self, id: VarId) -> BTreeSet<VarId> {
        self.neighbors(id, Direction::Incoming)
    }

    pub fn children(&self, id: VarId) -> BTreeSet<VarId> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: VarId, direction: Direction) -> BTreeSet<VarId> {
        if !self.dag.contains_node(id) {
            return BTreeSet::new();
        }
        self.dag.neighbors_directed(id, direction).collect()
    }

    pub fn exists_arc(&self, from: VarId, to: VarId) -> bool {
        self.dag.contains_edge(from, to)
    }

    /// All arcs, latent ones included, sorted.
    pub fn arcs(&self) -> Vec<(VarId, VarId)> {
        let mut arcs: Vec<(VarId, VarId)> = self.dag.all_edges().map(|(a, b, _)| (a, b)).collect();
        arcs.sort();
        arcs
    }

    /// Bidirected arcs implied by the latents: each unordered pair of children
    /// of a latent, as `(smaller, larger)`.
    pub fn bi_arcs(&self) -> BTreeSet<(VarId, VarId)> {
        self.latents.values().flat_map(Latent::pairs).collect()
    }

    /// `nodes` and their ancestors, latents included.
    pub fn ancestors(&self, nodes: &BTreeSet<VarId>) -> BTreeSet<VarId> {
        traversal::ancestors(&self.dag, nodes)
    }

    /// `nodes` and their descendants.
    pub fn descendants(&self, nodes: &BTreeSet<VarId>) -> BTreeSet<VarId> {
        traversal::descendants(&self.dag, nodes)
    }

    /// Observables in topological order; ties broken by smallest id.
    pub fn topological_order(&self) -> Vec<VarId> {
        let mut indegree: BTreeMap<VarId, usize> = self
            .dag
            .nodes()
            .map(|n| (n, self.dag.neighbors_directed(n, Direction::Incoming).count()))
            .collect();
        let mut ready: BTreeSet<VarId> = indegree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(n, _)| *n)
            .collect();
        let mut order = Vec::with_capacity(indegree.len());
        while let Some(node) = ready.pop_first() {
            if !self.is_latent(node) {
                order.push(node);
            }
            for child in self.dag.neighbors_directed(node, Direction::Outgoing) {
                if let Some(d) = indegree.get_mut(&child) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(child);
                    }
                }
            }
        }
        order
    }

    /// Confounded components of this model's observables.
    pub fn districts(&self) -> Vec<BTreeSet<VarId>> {
        districts::components(&self.observables(), self.bi_arcs())
    }

    /// Copy of the arc set without arcs entering `no_incoming` and without
    /// arcs leaving `no_outgoing`.
    pub fn mutilated(&self, no_incoming: &BTreeSet<VarId>, no_outgoing: &BTreeSet<VarId>) -> Dag {
        traversal::mutilate(&self.dag, no_incoming, no_outgoing)
    }

    /// `G_{\bar X}`.
    pub fn without_incoming(&self, xs: &BTreeSet<VarId>) -> Dag {
        self.mutilated(xs, &BTreeSet::new())
    }

    /// `G_{\underline X}`.
    pub fn without_outgoing(&self, xs: &BTreeSet<VarId>) -> Dag {
        self.mutilated(&BTreeSet::new(), xs)
    }

    /// Project the model onto the observables of `nodes`.
    ///
    /// Arcs survive when both endpoints do. Each latent keeps its surviving
    /// children and is dropped when fewer than two survive.
    pub fn induced_sub_model(&self, nodes: &BTreeSet<VarId>) -> CausalModel {
        let keep: BTreeSet<VarId> = nodes
            .iter()
            .filter(|n| self.dag.contains_node(**n) && !self.is_latent(**n))
            .copied()
            .collect();

        let mut dag = Dag::new();
        for node in &keep {
            dag.add_node(*node);
        }
        for (from, to, _) in self.dag.all_edges() {
            if keep.contains(&from) && keep.contains(&to) {
                dag.add_edge(from, to, ());
            }
        }

        let mut latents = BTreeMap::new();
        for (id, latent) in &self.latents {
            let children: BTreeSet<VarId> = latent.children.intersection(&keep).copied().collect();
            if children.len() < 2 {
                continue;
            }
            dag.add_node(*id);
            for child in &children {
                dag.add_edge(*id, *child, ());
            }
            latents.insert(
                *id,
                Latent {
                    name: latent.name.clone(),
                    children,
                },
            );
        }

        CausalModel {
            observational: self.observational.clone(),
            dag,
            latents,
        }
    }

    /// Add `from -> to`. Rejects arcs into latents, latent arcs towards
    /// undeclared children, and arcs closing a cycle.
    pub fn add_causal_arc(&mut self, from: VarId, to: VarId) -> Result<(), GraphError> {
        self.check_node(from, to)?;
        if self.is_latent(to) {
            return Err(self.invalid_arc(from, to, "no arc may point into a latent"));
        }
        if let Some(latent) = self.latents.get(&from) {
            if !latent.children.contains(&to) {
                return Err(self.invalid_arc(from, to, "latent arcs only target declared children"));
            }
        }
        if self.dag.contains_edge(from, to) {
            return Ok(());
        }
        if let Some(cycle) = dag_enforcement::would_create_cycle(&self.dag, from, to) {
            let path: Vec<String> = cycle.iter().map(|n| self.name_of(*n)).collect();
            return Err(GraphError::CycleDetected {
                path: path.join(" -> "),
            });
        }
        self.dag.add_edge(from, to, ());
        debug_assert!(dag_enforcement::is_acyclic(&self.dag));
        debug!(from = %self.name_of(from), to = %self.name_of(to), "causal arc added");
        Ok(())
    }

    /// Remove `from -> to`. Removing a latent arc drops that child from the
    /// latent, and the latent itself once it confounds fewer than two nodes.
    pub fn erase_causal_arc(&mut self, from: VarId, to: VarId) -> Result<(), GraphError> {
        self.check_node(from, to)?;
        if self.dag.remove_edge(from, to).is_none() {
            return Err(self.invalid_arc(from, to, "no such arc"));
        }
        let drop_latent = match self.latents.get_mut(&from) {
            Some(latent) => {
                latent.children.remove(&to);
                latent.children.len() < 2
            }
            None => false,
        };
        if drop_latent {
            self.dag.remove_node(from);
            if let Some(latent) = self.latents.remove(&from) {
                debug!(latent = %latent.name, "latent dropped after arc removal");
            }
        }
        Ok(())
    }

    fn check_node(&self, from: VarId, to: VarId) -> Result<(), GraphError> {
        for id in [from, to] {
            if !self.dag.contains_node(id) {
                return Err(GraphError::UnknownVariable {
                    name: id.to_string(),
                });
            }
        }
        Ok(())
    }

    fn invalid_arc(&self, from: VarId, to: VarId, reason: &str) -> GraphError {
        GraphError::InvalidArc {
            from: self.name_of(from),
            to: self.name_of(to),
            reason: reason.to_string(),
        }
    }
}

impl NameResolver for CausalModel {
    fn name_of(&self, id: VarId) -> String {
        match self.latents.get(&id) {
            Some(latent) => latent.name.clone(),
            None => self.observational.name_of(id),
        }
    }
}

impl fmt::Display for CausalModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (from, to) in self.arcs() {
            if self.is_latent(from) {
                continue;
            }
            writeln!(f, "{}->{}", self.name_of(from), self.name_of(to))?;
        }
        for latent in self.latents.values() {
            let children: Vec<String> = latent.children.iter().map(|c| self.name_of(*c)).collect();
            writeln!(f, "{} <-> {{{}}}", latent.name, children.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> BayesNet {
        let mut bn = BayesNet::new("abc");
        let a = bn.add_variable("A", &["0", "1"]).unwrap();
        let b = bn.add_variable("B", &["0", "1"]).unwrap();
        let c = bn.add_variable("C", &["0", "1"]).unwrap();
        bn.add_arc(a, b).unwrap();
        bn.add_arc(b, c).unwrap();
        bn.add_arc(a, c).unwrap();
        bn
    }

    #[test]
    fn latent_replaces_direct_arc_unless_kept() {
        let bn = network();
        let lat = [LatentDescriptor::new("U", ["A", "C"])];
        let model = CausalModel::new(&bn, &lat, false).unwrap();
        assert!(!model.exists_arc(VarId(0), VarId(2)));
        assert_eq!(model.latent_ids(), BTreeSet::from([VarId(3)]));
        assert_eq!(model.bi_arcs(), BTreeSet::from([(VarId(0), VarId(2))]));

        let kept = CausalModel::new(&bn, &lat, true).unwrap();
        assert!(kept.exists_arc(VarId(0), VarId(2)));
    }

    #[test]
    fn unknown_children_are_structural_errors() {
        let bn = network();
        let err = CausalModel::new(&bn, &[LatentDescriptor::new("U", ["A", "Z"])], false).unwrap_err();
        assert_eq!(err, GraphError::UnknownVariable { name: "Z".to_string() });
        let err = CausalModel::new(&bn, &[LatentDescriptor::new("U", ["A", "A"])], false).unwrap_err();
        assert!(matches!(err, GraphError::InvalidLatent { .. }));
    }

    #[test]
    fn arc_edits_keep_the_graph_acyclic() {
        let bn = network();
        let mut model = CausalModel::from_network(&bn);
        let err = model.add_causal_arc(VarId(2), VarId(0)).unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected { .. }));
        model.erase_causal_arc(VarId(1), VarId(2)).unwrap();
        assert!(!model.exists_arc(VarId(1), VarId(2)));
        assert!(model.erase_causal_arc(VarId(1), VarId(2)).is_err());
    }

    #[test]
    fn induced_model_keeps_latents_with_two_surviving_children() {
        let bn = network();
        let model =
            CausalModel::new(&bn, &[LatentDescriptor::new("U", ["A", "B", "C"])], false).unwrap();
        let sub = model.induced_sub_model(&BTreeSet::from([VarId(0), VarId(1)]));
        assert_eq!(sub.observables(), BTreeSet::from([VarId(0), VarId(1)]));
        assert_eq!(sub.bi_arcs(), BTreeSet::from([(VarId(0), VarId(1))]));

        let single = model.induced_sub_model(&BTreeSet::from([VarId(2)]));
        assert!(single.latents().is_empty());
    }

    #[test]
    fn topological_order_skips_latents() {
        let bn = network();
        let model = CausalModel::new(&bn, &[LatentDescriptor::new("U", ["A", "C"])], false).unwrap();
        assert_eq!(model.topological_order(), vec![VarId(0), VarId(1), VarId(2)]);
    }
}
