//! Counterfactual inference on a twin network.
//!
//! The factual world is the observational network itself. Every causal
//! descendant of the what-if variables is copied into a hypothetical world
//! (named with [`TWIN_SUFFIX`]); copies of the what-if variables lose their
//! parents and become point masses, the other copies read their causal
//! parents from the hypothetical world when a copy exists and from the
//! factual world otherwise. Roots and non-descendants are shared by both
//! worlds, and each endogenous CPT is read as a function of its parents.
//!
//! A copy whose node is a child of a declared latent shares its exogenous
//! noise with the factual node: both are drawn from one uniform through the
//! inverse CDFs of their CPT rows.

use std::collections::{BTreeMap, BTreeSet};

use causa_core::constants::TWIN_SUFFIX;
use causa_core::errors::{GraphError, ModelError};
use causa_core::model::Assignments;
use causa_core::{BayesNet, CausalError, CausalResult, InferenceOracle, NameResolver, Potential, VarId};
use tracing::{debug, info};

use super::causal_impact::label_index;
use crate::graph::CausalModel;

/// Factual network extended with hypothetical copies.
#[derive(Debug, Clone)]
pub struct TwinNetwork {
    network: BayesNet,
    /// Factual id → hypothetical id, for every copied node.
    twins: BTreeMap<VarId, VarId>,
}

impl TwinNetwork {
    /// Build the twin of `model` for an intervention fixing each `whatif` id
    /// to the given label index.
    ///
    /// Fails with [`GraphError::InvalidArc`] when a copied node's CPT is not
    /// indexed by exactly its observable causal parents.
    pub fn new(model: &CausalModel, whatif: &BTreeMap<VarId, usize>) -> CausalResult<Self> {
        let bn = model.observational();
        let mut network = BayesNet::new(&format!("{}{TWIN_SUFFIX}", bn.name()));
        for var in bn.variables() {
            let labels: Vec<&str> = var.labels.iter().map(String::as_str).collect();
            network.add_variable(&var.name, &labels)?;
        }
        for child in bn.ids() {
            for parent in bn.parents(child) {
                network.add_arc(*parent, child)?;
            }
        }
        for id in bn.ids() {
            if let Some(cpt) = bn.cpt(id) {
                network.set_cpt(id, cpt.values().to_vec())?;
            }
        }

        let changed = model.descendants(&whatif.keys().copied().collect());
        let mut twins = BTreeMap::new();
        for id in model.topological_order() {
            if !changed.contains(&id) {
                continue;
            }
            let Some(var) = bn.variable(id) else { continue };
            let labels: Vec<&str> = var.labels.iter().map(String::as_str).collect();
            let twin = network.add_variable(&format!("{}{TWIN_SUFFIX}", var.name), &labels)?;
            twins.insert(id, twin);

            if let Some(value) = whatif.get(&id) {
                let mut point = vec![0.0; labels.len()];
                if let Some(cell) = point.get_mut(*value) {
                    *cell = 1.0;
                }
                network.set_cpt(twin, point)?;
                continue;
            }

            check_mechanism(model, id)?;
            let hypothetical: Vec<VarId> = bn
                .parents(id)
                .iter()
                .map(|p| twins.get(p).copied().unwrap_or(*p))
                .collect();
            for source in &hypothetical {
                network.add_arc(*source, twin)?;
            }
            let Some(cpt) = bn.cpt(id) else { continue };
            let confounded = model.parents(id).iter().any(|p| model.is_latent(*p));
            if !confounded {
                network.set_cpt(twin, cpt.values().to_vec())?;
                continue;
            }

            // Shared noise: the copy also reads the factual node and the
            // factual values of its copied parents.
            let shifted: Vec<VarId> = bn
                .parents(id)
                .iter()
                .filter(|p| twins.contains_key(*p))
                .copied()
                .collect();
            for source in shifted.iter().chain([&id]) {
                network.add_arc(*source, twin)?;
            }
            let values = shared_noise_cpt(bn, id, cpt, &shifted)?;
            network.set_cpt(twin, values)?;
        }
        debug!(copies = twins.len(), size = network.size(), "twin network built");
        Ok(Self { network, twins })
    }

    pub fn network(&self) -> &BayesNet {
        &self.network
    }

    /// Hypothetical copy of `id`, if it has one.
    pub fn twin(&self, id: VarId) -> Option<VarId> {
        self.twins.get(&id).copied()
    }

    /// Id standing for `id` in the hypothetical world.
    pub fn hypothetical(&self, id: VarId) -> VarId {
        self.twin(id).unwrap_or(id)
    }

    /// Posterior of the hypothetical `on` given factual `profile`, over the
    /// original ids of `on`.
    pub fn query(
        &self,
        on: &BTreeSet<VarId>,
        profile: &BTreeMap<VarId, usize>,
    ) -> Result<Potential, ModelError> {
        let oracle = self.network.inference();
        let mut targets = BTreeSet::new();
        let mut fixed = Vec::new();
        for id in on {
            let hypothetical = self.hypothetical(*id);
            match profile.get(&hypothetical) {
                Some(value) => fixed.push((*id, *value)),
                None => {
                    targets.insert(hypothetical);
                }
            }
        }

        let back: BTreeMap<VarId, VarId> = self.twins.iter().map(|(f, t)| (*t, *f)).collect();
        let mut result = oracle.posterior_with_evidence(&targets, profile)?.rename(&back)?;
        for (id, value) in fixed {
            let card = self.network.cardinality(id).unwrap_or(1);
            let mut point = vec![0.0; card];
            if let Some(cell) = point.get_mut(value) {
                *cell = 1.0;
            }
            result = result.product(&Potential::from_values(&[(id, card)], point)?)?;
        }
        let order: Vec<VarId> = on.iter().copied().collect();
        result.reorder(&order)
    }
}

/// Distribution of `on` had `whatif` been set to `values`, given that
/// `profile` was observed. `profile` holds `(name, label)` pairs; `values`
/// holds one label per `whatif` name.
pub fn counterfactual(
    model: &CausalModel,
    profile: &[(&str, &str)],
    whatif: &[&str],
    on: &[&str],
    values: &[&str],
) -> CausalResult<Potential> {
    if whatif.len() != values.len() {
        return Err(CausalError::InvalidQuery {
            reason: format!("{} what-if variables but {} values", whatif.len(), values.len()),
        });
    }
    let mut evidence = BTreeMap::new();
    for (name, label) in profile {
        let id = model.require(name)?;
        evidence.insert(id, label_index(model, id, label)?);
    }
    let mut intervention = BTreeMap::new();
    for (name, label) in whatif.iter().zip(values) {
        let id = model.require(name)?;
        intervention.insert(id, label_index(model, id, label)?);
    }
    let targets = model.require_all(on.iter().copied())?;
    if targets.is_empty() {
        return Err(CausalError::InvalidQuery {
            reason: "no target variable".to_string(),
        });
    }

    let _span = causa_core::counterfactual_span!(whatif).entered();
    let twin = TwinNetwork::new(model, &intervention)?;
    let potential = twin.query(&targets, &evidence)?;
    info!(
        on = ?on,
        whatif = ?whatif,
        twins = twin.twins.len(),
        "counterfactual computed"
    );
    Ok(potential)
}

/// The CPT of `id` must be indexed by its observable causal parents, or
/// the copy would propagate along an arc the model does not hold causal.
fn check_mechanism(model: &CausalModel, id: VarId) -> Result<(), GraphError> {
    let bn = model.observational();
    let causal: BTreeSet<VarId> = model
        .parents(id)
        .into_iter()
        .filter(|p| !model.is_latent(*p))
        .collect();
    let recorded: BTreeSet<VarId> = bn.parents(id).iter().copied().collect();
    let Some(parent) = causal.symmetric_difference(&recorded).next().copied() else {
        return Ok(());
    };
    let reason = if recorded.contains(&parent) {
        "observational dependence is not a causal arc of the model"
    } else {
        "causal arc is missing from the observational network"
    };
    Err(GraphError::InvalidArc {
        from: model.name_of(parent),
        to: model.name_of(id),
        reason: reason.to_string(),
    })
}

/// CPT of the copy of `id` over `[hypothetical parents.., shifted.., id, copy]`,
/// where `shifted` are the factual ids of the copied parents.
fn shared_noise_cpt(
    bn: &BayesNet,
    id: VarId,
    cpt: &Potential,
    shifted: &[VarId],
) -> Result<Vec<f64>, ModelError> {
    let parents = bn.parents(id);
    let card = bn.cardinality(id).unwrap_or(1);
    let mut cards: Vec<usize> = parents
        .iter()
        .chain(shifted)
        .map(|p| bn.cardinality(*p).unwrap_or(1))
        .collect();
    cards.push(card);

    let mut values = Vec::with_capacity(cards.iter().product::<usize>() * card);
    for idx in Assignments::new(&cards) {
        let mut hypothetical = BTreeMap::new();
        let mut factual = BTreeMap::new();
        for (k, parent) in parents.iter().enumerate() {
            hypothetical.insert(*parent, idx[k]);
            let value = match shifted.iter().position(|s| s == parent) {
                Some(pos) => idx[parents.len() + pos],
                None => idx[k],
            };
            factual.insert(*parent, value);
        }
        let observed = idx[cards.len() - 1];
        let factual_row = cpt.extract(&factual)?;
        let hypothetical_row = cpt.extract(&hypothetical)?;
        values.extend(coupled_row(factual_row.values(), hypothetical_row.values(), observed));
    }
    Ok(values)
}

/// `P(copy | factual = observed)` when both are read off one uniform draw
/// through the cumulative sums of their rows.
fn coupled_row(factual: &[f64], hypothetical: &[f64], observed: usize) -> Vec<f64> {
    let mass = factual.get(observed).copied().unwrap_or(0.0);
    if mass <= 0.0 {
        return hypothetical.to_vec();
    }
    let low: f64 = factual[..observed].iter().sum();
    let high = low + mass;
    let mut start = 0.0;
    hypothetical
        .iter()
        .map(|q| {
            let end = start + q;
            let overlap = (high.min(end) - low.max(start)).max(0.0);
            start = end;
            overlap / mass
        })
        .collect()
}
