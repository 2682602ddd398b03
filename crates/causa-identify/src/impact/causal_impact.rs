//! Causal impact: `P(on | do(doing), knowing)` as a formula, a number and an
//! explanation.

use std::collections::{BTreeMap, BTreeSet};

use causa_core::errors::IdentificationFailure;
use causa_core::{CausaConfig, CausalError, CausalResult, NameResolver, Potential, VarId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::explanation::{self, Strategy};
use crate::adjustment::{BackdoorGenerator, FrontdoorGenerator};
use crate::formula::{CausalFormula, Formula};
use crate::graph::CausalModel;
use crate::identification::id::validate_query;
use crate::identification::Identifier;

/// A causal query by variable names and labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CausalQuery {
    pub on: Vec<String>,
    pub doing: Vec<String>,
    pub knowing: Vec<String>,
    /// Label assignments restricting the resulting potential.
    pub values: BTreeMap<String, String>,
}

impl CausalQuery {
    pub fn on<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            on: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn doing<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.doing = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn knowing<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.knowing = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn value(mut self, name: &str, label: &str) -> Self {
        self.values.insert(name.to_string(), label.to_string());
        self
    }
}

/// Outcome of a causal-impact query. Formula and potential are absent when
/// the effect is not identifiable; the explanation then says why.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalImpact {
    pub formula: Option<CausalFormula>,
    pub potential: Option<Potential>,
    pub explanation: String,
}

impl CausalImpact {
    pub fn is_identified(&self) -> bool {
        self.formula.is_some()
    }
}

/// Answers causal-impact queries with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct CausalEngine {
    config: CausaConfig,
}

impl CausalEngine {
    pub fn new(config: CausaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CausaConfig {
        &self.config
    }

    pub fn impact(&self, model: &CausalModel, query: &CausalQuery) -> CausalResult<CausalImpact> {
        let on = model.require_all(&query.on)?;
        let doing = model.require_all(&query.doing)?;
        let knowing = model.require_all(&query.knowing)?;
        let mut values = BTreeMap::new();
        for (name, label) in &query.values {
            let id = model.require(name)?;
            values.insert(id, label_index(model, id, label)?);
        }
        self.impact_ids(model, &on, &doing, &knowing, &values)
    }

    /// Same as [`CausalEngine::impact`] on resolved ids and label indices.
    pub fn impact_ids(
        &self,
        model: &CausalModel,
        on: &BTreeSet<VarId>,
        doing: &BTreeSet<VarId>,
        knowing: &BTreeSet<VarId>,
        values: &BTreeMap<VarId, usize>,
    ) -> CausalResult<CausalImpact> {
        validate_query(model, on, doing, knowing)?;
        let _span = causa_core::identification_span!(on, doing).entered();

        let (root, explanation) = match self.identify(model, on, doing, knowing) {
            Ok(found) => found,
            Err(failure) => {
                info!(error = %failure, "causal effect not identifiable");
                return Ok(CausalImpact {
                    formula: None,
                    potential: None,
                    explanation: explanation::failure(&failure),
                });
            }
        };

        let formula = CausalFormula::new(root, on.clone(), doing.clone(), knowing.clone());
        let oracle = model.observational().inference();
        let raw = formula.evaluate_with(&oracle, &self.config.evaluation)?;
        let order: Vec<VarId> = on.iter().chain(doing).chain(knowing).copied().collect();
        // Variables intervened on by the ID recursion itself do not change the
        // result; fix them at their first label.
        let mut fixed = values.clone();
        for var in raw.vars() {
            if !order.contains(var) && !fixed.contains_key(var) {
                debug!(variable = %model.name_of(*var), "invariant variable fixed");
                fixed.insert(*var, 0);
            }
        }
        let potential = arrange(&raw, &order)?.extract(&fixed)?;
        info!(
            query = %formula.query(model),
            explanation = %explanation,
            cells = potential.len(),
            "causal impact computed"
        );
        Ok(CausalImpact {
            formula: Some(formula),
            potential: Some(potential),
            explanation,
        })
    }

    /// First applicable strategy: observational, adjustment sets, do-calculus.
    fn identify(
        &self,
        model: &CausalModel,
        on: &BTreeSet<VarId>,
        doing: &BTreeSet<VarId>,
        knowing: &BTreeSet<VarId>,
    ) -> Result<(Formula, String), IdentificationFailure> {
        let settings = &self.config.identification;
        if doing.is_empty() {
            let formula = Formula::posterior(on.clone(), knowing.clone());
            return Ok((formula, explanation::render(Strategy::Observational, model, knowing)));
        }

        if let Some((cause, effect)) = single_pair(on, doing, knowing) {
            let excluded = BTreeSet::new();
            if settings.try_backdoor {
                let _span =
                    causa_core::adjustment_span!("backdoor", model.name_of(cause), model.name_of(effect))
                        .entered();
                let mut backdoor =
                    BackdoorGenerator::with_max_size(model, cause, effect, &excluded, settings.max_set_size);
                if let Some(set) = backdoor.next() {
                    debug!(set = ?set, "backdoor set selected");
                    return Ok(if set.is_empty() {
                        let formula = Formula::posterior(BTreeSet::from([effect]), BTreeSet::from([cause]));
                        (formula, explanation::render(Strategy::NoConfounding, model, &set))
                    } else {
                        let text = explanation::render(Strategy::Backdoor, model, &set);
                        (backdoor_formula(cause, effect, set), text)
                    });
                }
            }
            if settings.try_frontdoor {
                let _span =
                    causa_core::adjustment_span!("frontdoor", model.name_of(cause), model.name_of(effect))
                        .entered();
                let mut frontdoor =
                    FrontdoorGenerator::with_max_size(model, cause, effect, &excluded, settings.max_set_size);
                if let Some(set) = frontdoor.next() {
                    debug!(set = ?set, "frontdoor set selected");
                    let text = explanation::render(Strategy::Frontdoor, model, &set);
                    return Ok((frontdoor_formula(cause, effect, set), text));
                }
            }
        }

        let identifier = Identifier::with_config(model, settings.clone());
        let formula = if knowing.is_empty() {
            identifier.identify_unchecked(on, doing)?
        } else {
            identifier.idc(on, doing, knowing)?
        };
        Ok((formula, explanation::render(Strategy::DoCalculus, model, &BTreeSet::new())))
    }
}

/// Impact of `doing` on `on` given `knowing`, with the default configuration.
/// `values` are `(name, label)` pairs restricting the result.
pub fn causal_impact(
    model: &CausalModel,
    on: &[&str],
    doing: &[&str],
    knowing: &[&str],
    values: &[(&str, &str)],
) -> CausalResult<CausalImpact> {
    let mut query = CausalQuery::on(on.iter().copied())
        .doing(doing.iter().copied())
        .knowing(knowing.iter().copied());
    for (name, label) in values {
        query = query.value(name, label);
    }
    CausalEngine::default().impact(model, &query)
}

/// `(cause, effect)` when the query is one unconditioned cause and one effect.
fn single_pair(
    on: &BTreeSet<VarId>,
    doing: &BTreeSet<VarId>,
    knowing: &BTreeSet<VarId>,
) -> Option<(VarId, VarId)> {
    if !knowing.is_empty() || doing.len() != 1 || on.len() != 1 {
        return None;
    }
    Some((*doing.first()?, *on.first()?))
}

/// `Σ_Z P(effect | cause, Z) · P(Z)`.
fn backdoor_formula(cause: VarId, effect: VarId, set: BTreeSet<VarId>) -> Formula {
    let mut conditions = set.clone();
    conditions.insert(cause);
    Formula::sum(
        set.clone(),
        Formula::product(vec![
            Formula::posterior(BTreeSet::from([effect]), conditions),
            Formula::joint(set),
        ]),
    )
}

/// `Σ_Z P(Z | cause) · Σ_cause P(effect | cause, Z) · P(cause)`.
fn frontdoor_formula(cause: VarId, effect: VarId, set: BTreeSet<VarId>) -> Formula {
    let mut conditions = set.clone();
    conditions.insert(cause);
    let inner = Formula::sum(
        BTreeSet::from([cause]),
        Formula::product(vec![
            Formula::posterior(BTreeSet::from([effect]), conditions),
            Formula::joint(BTreeSet::from([cause])),
        ]),
    );
    Formula::sum(
        set.clone(),
        Formula::product(vec![Formula::posterior(set, BTreeSet::from([cause])), inner]),
    )
}

/// Lay the scope out as `order` (members missing from the scope skipped),
/// any remaining variables last.
fn arrange(potential: &Potential, order: &[VarId]) -> CausalResult<Potential> {
    let mut layout: Vec<VarId> = order.iter().filter(|v| potential.contains(**v)).copied().collect();
    for var in potential.vars() {
        if !layout.contains(var) {
            layout.push(*var);
        }
    }
    Ok(potential.reorder(&layout)?)
}

pub(crate) fn label_index(model: &CausalModel, id: VarId, label: &str) -> CausalResult<usize> {
    model
        .observational()
        .variable(id)
        .and_then(|v| v.label_index(label))
        .ok_or_else(|| CausalError::InvalidQuery {
            reason: format!("unknown label {label} for {}", model.name_of(id)),
        })
}
