//! The observational Bayesian network: variables, arcs and CPTs.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::debug;

use super::{Potential, VarId, Variable};
use crate::errors::ModelError;
use crate::traits::NameResolver;

/// Row sums of a CPT may deviate from 1 by at most this much.
const CPT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Default)]
pub struct BayesNet {
    name: String,
    variables: Vec<Variable>,
    by_name: HashMap<String, VarId>,
    parents: Vec<Vec<VarId>>,
    children: Vec<BTreeSet<VarId>>,
    cpts: Vec<Potential>,
}

impl BayesNet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a variable with a uniform CPT. Ids are allocated densely from 0.
    pub fn add_variable(&mut self, name: &str, labels: &[&str]) -> Result<VarId, ModelError> {
        if self.by_name.contains_key(name) {
            return Err(ModelError::DuplicateVariable {
                name: name.to_string(),
            });
        }
        if labels.is_empty() {
            return Err(ModelError::InvalidPotential {
                reason: format!("variable {name} needs at least one label"),
            });
        }
        let id = VarId(self.variables.len() as u32);
        self.variables.push(Variable {
            id,
            name: name.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        });
        self.by_name.insert(name.to_string(), id);
        self.parents.push(Vec::new());
        self.children.push(BTreeSet::new());
        self.cpts.push(Self::uniform(&[(id, labels.len())])?);
        Ok(id)
    }

    /// Add `parent -> child`. The child's CPT is reset to uniform over its new scope.
    pub fn add_arc(&mut self, parent: VarId, child: VarId) -> Result<(), ModelError> {
        self.check(parent)?;
        self.check(child)?;
        if self.parents[child.index()].contains(&parent) {
            return Ok(());
        }
        if let Some(path) = self.path(child, parent) {
            let mut names: Vec<String> = path.iter().map(|v| self.name_of(*v)).collect();
            names.push(self.name_of(child));
            return Err(ModelError::CycleDetected {
                from: self.name_of(parent),
                to: self.name_of(child),
                path: names.join(" -> "),
            });
        }
        self.parents[child.index()].push(parent);
        self.children[parent.index()].insert(child);
        self.reset_cpt(child)?;
        debug!(parent = %self.name_of(parent), child = %self.name_of(child), "arc added");
        Ok(())
    }

    /// Remove `parent -> child` if present. Returns whether an arc was removed.
    pub fn erase_arc(&mut self, parent: VarId, child: VarId) -> Result<bool, ModelError> {
        self.check(parent)?;
        self.check(child)?;
        let before = self.parents[child.index()].len();
        self.parents[child.index()].retain(|p| *p != parent);
        if self.parents[child.index()].len() == before {
            return Ok(false);
        }
        self.children[parent.index()].remove(&child);
        self.reset_cpt(child)?;
        Ok(true)
    }

    /// Replace the CPT of `var`; scope is `[parents.., var]`, last varies fastest.
    pub fn set_cpt(&mut self, var: VarId, values: Vec<f64>) -> Result<(), ModelError> {
        self.check(var)?;
        let scope = self.cpt_scope(var);
        let cpt = Potential::from_values(&scope, values)?;
        let card = self.variables[var.index()].cardinality();
        for (row, chunk) in cpt.values().chunks(card).enumerate() {
            if chunk.iter().any(|v| *v < 0.0 || !v.is_finite()) {
                return Err(ModelError::InvalidPotential {
                    reason: format!("CPT of {} has an invalid entry in row {row}", self.name_of(var)),
                });
            }
            let total: f64 = chunk.iter().sum();
            if (total - 1.0).abs() > CPT_TOLERANCE {
                return Err(ModelError::InvalidPotential {
                    reason: format!(
                        "CPT of {} row {row} sums to {total}, expected 1",
                        self.name_of(var)
                    ),
                });
            }
        }
        self.cpts[var.index()] = cpt;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn ids(&self) -> impl Iterator<Item = VarId> + '_ {
        self.variables.iter().map(|v| v.id)
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    pub fn id_from_name(&self, name: &str) -> Option<VarId> {
        self.by_name.get(name).copied()
    }

    /// Like [`BayesNet::id_from_name`] but an unknown name is an error.
    pub fn require(&self, name: &str) -> Result<VarId, ModelError> {
        self.id_from_name(name)
            .ok_or_else(|| ModelError::UnknownVariable {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, id: VarId) -> bool {
        id.index() < self.variables.len()
    }

    pub fn cardinality(&self, id: VarId) -> Option<usize> {
        self.variable(id).map(Variable::cardinality)
    }

    /// Parents in CPT order.
    pub fn parents(&self, id: VarId) -> &[VarId] {
        self.parents.get(id.index()).map_or(&[], Vec::as_slice)
    }

    pub fn children(&self, id: VarId) -> BTreeSet<VarId> {
        self.children.get(id.index()).cloned().unwrap_or_default()
    }

    /// All arcs, sorted by (parent, child).
    pub fn arcs(&self) -> Vec<(VarId, VarId)> {
        let mut arcs: Vec<(VarId, VarId)> = self
            .parents
            .iter()
            .enumerate()
            .flat_map(|(child, ps)| ps.iter().map(move |p| (*p, VarId(child as u32))))
            .collect();
        arcs.sort();
        arcs
    }

    pub fn cpt(&self, id: VarId) -> Option<&Potential> {
        self.cpts.get(id.index())
    }

    pub fn roots(&self) -> BTreeSet<VarId> {
        self.ids().filter(|v| self.parents(*v).is_empty()).collect()
    }

    /// Kahn's order, smallest ready id first.
    pub fn topological_order(&self) -> Vec<VarId> {
        let mut indegree: Vec<usize> = self.parents.iter().map(Vec::len).collect();
        let mut ready: BTreeSet<VarId> = self.roots();
        let mut order = Vec::with_capacity(self.size());
        while let Some(next) = ready.pop_first() {
            order.push(next);
            for child in &self.children[next.index()] {
                indegree[child.index()] -= 1;
                if indegree[child.index()] == 0 {
                    ready.insert(*child);
                }
            }
        }
        order
    }

    /// `nodes` together with all their ancestors.
    pub fn ancestral_closure(&self, nodes: &BTreeSet<VarId>) -> BTreeSet<VarId> {
        let mut seen = nodes.clone();
        let mut queue: VecDeque<VarId> = nodes.iter().copied().collect();
        while let Some(node) = queue.pop_front() {
            for parent in self.parents(node) {
                if seen.insert(*parent) {
                    queue.push_back(*parent);
                }
            }
        }
        seen
    }

    fn check(&self, id: VarId) -> Result<(), ModelError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(ModelError::UnknownVariable {
                name: id.to_string(),
            })
        }
    }

    fn cpt_scope(&self, var: VarId) -> Vec<(VarId, usize)> {
        let mut scope: Vec<(VarId, usize)> = self.parents[var.index()]
            .iter()
            .map(|p| (*p, self.variables[p.index()].cardinality()))
            .collect();
        scope.push((var, self.variables[var.index()].cardinality()));
        scope
    }

    fn reset_cpt(&mut self, var: VarId) -> Result<(), ModelError> {
        let scope = self.cpt_scope(var);
        self.cpts[var.index()] = Self::uniform(&scope)?;
        Ok(())
    }

    fn uniform(scope: &[(VarId, usize)]) -> Result<Potential, ModelError> {
        let card = scope.last().map_or(1, |(_, c)| *c);
        let size: usize = scope.iter().map(|(_, c)| *c).product();
        Potential::from_values(scope, vec![1.0 / card as f64; size])
    }

    /// Directed path `from ⇝ to` (inclusive), if any.
    fn path(&self, from: VarId, to: VarId) -> Option<Vec<VarId>> {
        let mut previous: HashMap<VarId, VarId> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        let mut seen = BTreeSet::from([from]);
        while let Some(node) = queue.pop_front() {
            if node == to {
                let mut path = vec![to];
                let mut cursor = to;
                while let Some(prev) = previous.get(&cursor) {
                    path.push(*prev);
                    cursor = *prev;
                }
                path.reverse();
                return Some(path);
            }
            for child in &self.children[node.index()] {
                if seen.insert(*child) {
                    previous.insert(*child, node);
                    queue.push_back(*child);
                }
            }
        }
        None
    }
}

impl NameResolver for BayesNet {
    fn name_of(&self, id: VarId) -> String {
        self.variable(id)
            .map_or_else(|| id.to_string(), |v| v.name.clone())
    }
}
