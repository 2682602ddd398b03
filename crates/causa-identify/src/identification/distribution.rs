use std::collections::BTreeSet;

use causa_core::VarId;

use crate::formula::Formula;

/// The distribution the ID recursion is currently working with.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// The observational joint over `vars`, answered directly by the oracle.
    Observational { vars: BTreeSet<VarId> },
    /// A distribution over `vars` given by a formula. The formula may also
    /// depend on intervened variables outside `vars`.
    Expression { vars: BTreeSet<VarId>, formula: Formula },
}

impl Distribution {
    pub fn observational(vars: BTreeSet<VarId>) -> Self {
        Self::Observational { vars }
    }

    pub fn vars(&self) -> &BTreeSet<VarId> {
        match self {
            Self::Observational { vars } | Self::Expression { vars, .. } => vars,
        }
    }

    /// `P(keep)`.
    pub fn marginal(&self, keep: &BTreeSet<VarId>) -> Formula {
        match self {
            Self::Observational { .. } => Formula::joint(keep.clone()),
            Self::Expression { vars, formula } => Formula::sum(difference(vars, keep), formula.clone()),
        }
    }

    /// `P(targets | conditions)`.
    pub fn conditional(&self, targets: &BTreeSet<VarId>, conditions: &BTreeSet<VarId>) -> Formula {
        if conditions.is_empty() {
            return self.marginal(targets);
        }
        match self {
            Self::Observational { .. } => Formula::posterior(targets.clone(), conditions.clone()),
            Self::Expression { vars, formula } => {
                let both: BTreeSet<VarId> = targets.union(conditions).copied().collect();
                Formula::division(
                    Formula::sum(difference(vars, &both), formula.clone()),
                    Formula::sum(difference(vars, conditions), formula.clone()),
                )
            }
        }
    }

    /// The marginal over `keep`, as a distribution.
    pub fn restrict(&self, keep: &BTreeSet<VarId>) -> Self {
        match self {
            Self::Observational { vars } => Self::Observational {
                vars: vars.intersection(keep).copied().collect(),
            },
            Self::Expression { vars, formula } => Self::Expression {
                vars: vars.intersection(keep).copied().collect(),
                formula: Formula::sum(difference(vars, keep), formula.clone()),
            },
        }
    }
}

fn difference(a: &BTreeSet<VarId>, b: &BTreeSet<VarId>) -> BTreeSet<VarId> {
    a.difference(b).copied().collect()
}
