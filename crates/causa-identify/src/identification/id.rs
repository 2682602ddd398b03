//! The ID algorithm (Shpitser & Pearl, 2006) over the latent-augmented graph.
//!
//! Returns a formula for `P(y | do(x))` in terms of the observational
//! distribution, or a hedge proving that none exists.

use std::collections::BTreeSet;

use causa_core::config::IdentificationConfig;
use causa_core::errors::{GraphError, IdentificationFailure};
use causa_core::{CausalError, CausalResult, NameResolver, VarId};
use tracing::debug;

use super::{Distribution, Rule};
use crate::formula::{CausalFormula, Formula};
use crate::graph::{traversal, CausalModel};

/// Runs identification queries against one model.
#[derive(Debug, Clone)]
pub struct Identifier<'a> {
    model: &'a CausalModel,
    config: IdentificationConfig,
}

impl<'a> Identifier<'a> {
    pub fn new(model: &'a CausalModel) -> Self {
        Self::with_config(model, IdentificationConfig::default())
    }

    pub fn with_config(model: &'a CausalModel, config: IdentificationConfig) -> Self {
        Self { model, config }
    }

    pub fn model(&self) -> &'a CausalModel {
        self.model
    }

    pub fn config(&self) -> &IdentificationConfig {
        &self.config
    }

    /// Formula for `P(on | do(doing))`.
    pub fn identify(&self, on: &BTreeSet<VarId>, doing: &BTreeSet<VarId>) -> CausalResult<Formula> {
        validate_query(self.model, on, doing, &BTreeSet::new())?;
        let _span = causa_core::identification_span!(on, doing).entered();
        self.identify_unchecked(on, doing).map_err(CausalError::from)
    }

    pub(crate) fn identify_unchecked(
        &self,
        on: &BTreeSet<VarId>,
        doing: &BTreeSet<VarId>,
    ) -> Result<Formula, IdentificationFailure> {
        if doing.is_empty() {
            return Ok(Formula::joint(on.clone()));
        }
        if self.config.apply_rules {
            if let Some(formula) = self.by_rules(on, doing) {
                return Ok(formula);
            }
        }
        let p = Distribution::observational(self.model.observables());
        id(self.model, on, doing, &p, 0)
    }

    /// Shortcuts when a single rule removes the intervention outright.
    fn by_rules(&self, on: &BTreeSet<VarId>, doing: &BTreeSet<VarId>) -> Option<Formula> {
        let none = BTreeSet::new();
        if Rule::InsertDeleteAction.applies(self.model, on, &none, doing, &none) {
            debug!(rule = %Rule::InsertDeleteAction, "intervention removed");
            return Some(Formula::joint(on.clone()));
        }
        if Rule::ExchangeActionObservation.applies(self.model, on, &none, doing, &none) {
            debug!(rule = %Rule::ExchangeActionObservation, "intervention exchanged");
            return Some(Formula::posterior(on.clone(), doing.clone()));
        }
        None
    }
}

/// Formula for `P(on | do(doing))` with the default configuration.
pub fn identifying_intervention(
    model: &CausalModel,
    on: &BTreeSet<VarId>,
    doing: &BTreeSet<VarId>,
) -> CausalResult<Formula> {
    Identifier::new(model).identify(on, doing)
}

/// Like [`identifying_intervention`], wrapped with its query.
pub fn do_calculus(
    model: &CausalModel,
    on: &BTreeSet<VarId>,
    doing: &BTreeSet<VarId>,
) -> CausalResult<CausalFormula> {
    let root = identifying_intervention(model, on, doing)?;
    Ok(CausalFormula::new(root, on.clone(), doing.clone(), BTreeSet::new()))
}

/// `on` must be non-empty; all three sets must be disjoint observables.
pub(crate) fn validate_query(
    model: &CausalModel,
    on: &BTreeSet<VarId>,
    doing: &BTreeSet<VarId>,
    knowing: &BTreeSet<VarId>,
) -> CausalResult<()> {
    if on.is_empty() {
        return Err(CausalError::InvalidQuery {
            reason: "no target variable".to_string(),
        });
    }
    for id in on.iter().chain(doing).chain(knowing) {
        if !model.contains(*id) || model.is_latent(*id) {
            return Err(GraphError::UnknownVariable {
                name: model.name_of(*id),
            }
            .into());
        }
    }
    if !on.is_disjoint(doing) {
        return Err(CausalError::InvalidQuery {
            reason: "a variable cannot be both target and intervention".to_string(),
        });
    }
    if !knowing.is_disjoint(on) || !knowing.is_disjoint(doing) {
        return Err(CausalError::InvalidQuery {
            reason: "observed variables must differ from targets and interventions".to_string(),
        });
    }
    Ok(())
}

fn id(
    model: &CausalModel,
    y: &BTreeSet<VarId>,
    x: &BTreeSet<VarId>,
    p: &Distribution,
    depth: usize,
) -> Result<Formula, IdentificationFailure> {
    let v = model.observables();
    debug!(depth, y = ?y, x = ?x, v = ?v, "id");

    // 1
    if x.is_empty() {
        return Ok(p.marginal(y));
    }

    // 2
    let an_y = observable(model, &model.ancestors(y));
    if an_y != v {
        let sub = model.induced_sub_model(&an_y);
        let x = intersection(x, &an_y);
        return id(&sub, y, &x, &p.restrict(&an_y), depth + 1);
    }

    // 3
    let an_y_bar_x = observable(model, &traversal::ancestors(&model.without_incoming(x), y));
    let w: BTreeSet<VarId> = v
        .iter()
        .filter(|n| !x.contains(n) && !an_y_bar_x.contains(n))
        .copied()
        .collect();
    if !w.is_empty() {
        let x = union(x, &w);
        return id(model, y, &x, p, depth + 1);
    }

    // 4
    let v_minus_x = difference(&v, x);
    let components = model.induced_sub_model(&v_minus_x).districts();
    if components.len() > 1 {
        let mut factors = Vec::with_capacity(components.len());
        for s in &components {
            factors.push(id(model, s, &difference(&v, s), p, depth + 1)?);
        }
        let summed = difference(&v, &union(y, x));
        return Ok(Formula::sum(summed, Formula::product(factors)));
    }

    let s = v_minus_x;
    let districts = model.districts();

    // 5
    if districts.len() == 1 {
        let message = format!(
            "hedge on {{{}}} with witness {{{}}}",
            names(model, &v),
            names(model, &s)
        );
        return Err(IdentificationFailure::hedge(message, v, s));
    }

    let order = model.topological_order();

    // 6
    if districts.contains(&s) {
        let factors = chain_factors(&order, &s, p);
        return Ok(Formula::sum(difference(&s, y), Formula::product(factors)));
    }

    // 7
    let Some(s_prime) = districts.iter().find(|d| s.is_subset(d)) else {
        return Err(IdentificationFailure::unidentifiable(format!(
            "no district of the graph contains {{{}}}",
            names(model, &s)
        )));
    };
    let p_prime = Distribution::Expression {
        vars: s_prime.clone(),
        formula: Formula::product(chain_factors(&order, s_prime, p)),
    };
    let sub = model.induced_sub_model(s_prime);
    id(&sub, y, &intersection(x, s_prime), &p_prime, depth + 1)
}

/// `Π_{v ∈ keep} P(v | v_π^(i-1))` over the topological order `order`.
fn chain_factors(order: &[VarId], keep: &BTreeSet<VarId>, p: &Distribution) -> Vec<Formula> {
    let mut factors = Vec::new();
    let mut before = BTreeSet::new();
    for node in order {
        if keep.contains(node) {
            factors.push(p.conditional(&BTreeSet::from([*node]), &before));
        }
        before.insert(*node);
    }
    factors
}

fn observable(model: &CausalModel, nodes: &BTreeSet<VarId>) -> BTreeSet<VarId> {
    nodes.iter().filter(|n| !model.is_latent(**n)).copied().collect()
}

fn names(model: &CausalModel, nodes: &BTreeSet<VarId>) -> String {
    nodes.iter().map(|n| model.name_of(*n)).collect::<Vec<_>>().join(",")
}

fn union(a: &BTreeSet<VarId>, b: &BTreeSet<VarId>) -> BTreeSet<VarId> {
    a.union(b).copied().collect()
}

fn intersection(a: &BTreeSet<VarId>, b: &BTreeSet<VarId>) -> BTreeSet<VarId> {
    a.intersection(b).copied().collect()
}

fn difference(a: &BTreeSet<VarId>, b: &BTreeSet<VarId>) -> BTreeSet<VarId> {
    a.difference(b).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LatentDescriptor;
    use causa_core::BayesNet;

    fn set(ids: &[u32]) -> BTreeSet<VarId> {
        ids.iter().map(|i| VarId(*i)).collect()
    }

    fn network(names: &[&str], arcs: &[(usize, usize)]) -> BayesNet {
        let mut bn = BayesNet::new("test");
        for name in names {
            bn.add_variable(name, &["0", "1"]).unwrap();
        }
        for (a, b) in arcs {
            bn.add_arc(VarId(*a as u32), VarId(*b as u32)).unwrap();
        }
        bn
    }

    fn no_rules(model: &CausalModel) -> Identifier<'_> {
        let config = IdentificationConfig {
            apply_rules: false,
            ..IdentificationConfig::default()
        };
        Identifier::with_config(model, config)
    }

    #[test]
    fn unconfounded_effect_is_the_conditional() {
        let bn = network(&["A", "B"], &[(0, 1)]);
        let model = CausalModel::from_network(&bn);
        let f = no_rules(&model).identify(&set(&[1]), &set(&[0])).unwrap();
        assert_eq!(f, Formula::posterior(set(&[1]), set(&[0])));
        let f = Identifier::new(&model).identify(&set(&[1]), &set(&[0])).unwrap();
        assert_eq!(f, Formula::posterior(set(&[1]), set(&[0])));
    }

    #[test]
    fn observed_confounder_gives_the_adjustment_formula() {
        // G -> D, G -> R, D -> R
        let bn = network(&["G", "D", "R"], &[(0, 1), (0, 2), (1, 2)]);
        let model = CausalModel::from_network(&bn);
        let f = identifying_intervention(&model, &set(&[2]), &set(&[1])).unwrap();
        let expected = Formula::sum(
            set(&[0]),
            Formula::product(vec![
                Formula::joint(set(&[0])),
                Formula::posterior(set(&[2]), set(&[0, 1])),
            ]),
        );
        assert_eq!(f, expected);
    }

    #[test]
    fn bow_graph_is_a_hedge() {
        let bn = network(&["A", "B"], &[(0, 1)]);
        let model = CausalModel::new(&bn, &[LatentDescriptor::new("U", ["A", "B"])], true).unwrap();
        let err = identifying_intervention(&model, &set(&[1]), &set(&[0])).unwrap_err();
        match err {
            CausalError::Identification(IdentificationFailure::Hedge(hedge)) => {
                assert_eq!(hedge.observables, set(&[0, 1]));
                assert_eq!(hedge.witness, set(&[1]));
            }
            other => panic!("expected a hedge, got {other:?}"),
        }
    }

    #[test]
    fn front_door_structure_is_identified() {
        // S -> T -> C, S <-> C
        let bn = network(&["S", "T", "C"], &[(0, 1), (1, 2), (0, 2)]);
        let model = CausalModel::new(&bn, &[LatentDescriptor::new("U", ["S", "C"])], false).unwrap();
        let f = identifying_intervention(&model, &set(&[2]), &set(&[0])).unwrap();
        let expected = Formula::sum(
            set(&[1]),
            Formula::product(vec![
                Formula::posterior(set(&[1]), set(&[0])),
                Formula::sum(
                    set(&[0]),
                    Formula::product(vec![
                        Formula::joint(set(&[0])),
                        Formula::posterior(set(&[2]), set(&[0, 1])),
                    ]),
                ),
            ]),
        );
        assert_eq!(f, expected);
    }

    #[test]
    fn invalid_queries_are_rejected() {
        let bn = network(&["A", "B"], &[(0, 1)]);
        let model = CausalModel::from_network(&bn);
        assert!(matches!(
            identifying_intervention(&model, &set(&[1]), &set(&[1])),
            Err(CausalError::InvalidQuery { .. })
        ));
        assert!(matches!(
            identifying_intervention(&model, &set(&[7]), &set(&[0])),
            Err(CausalError::Graph(GraphError::UnknownVariable { .. }))
        ));
    }
}
