//! Exact sum-product over the ancestral set of a query.
//!
//! Barren nodes (non-ancestors of the query) are dropped before elimination;
//! the remaining non-query nodes are summed out children first.

use std::collections::BTreeSet;

use tracing::trace;

use crate::errors::ModelError;
use crate::model::{BayesNet, Potential, VarId};
use crate::traits::InferenceOracle;

#[derive(Debug, Clone, Copy)]
pub struct ExactInference<'a> {
    bn: &'a BayesNet,
}

impl<'a> ExactInference<'a> {
    pub fn new(bn: &'a BayesNet) -> Self {
        Self { bn }
    }

    pub fn network(&self) -> &'a BayesNet {
        self.bn
    }
}

impl InferenceOracle for ExactInference<'_> {
    fn joint(&self, vars: &BTreeSet<VarId>) -> Result<Potential, ModelError> {
        for var in vars {
            if !self.bn.contains(*var) {
                return Err(ModelError::UnknownVariable {
                    name: var.to_string(),
                });
            }
        }
        let relevant = self.bn.ancestral_closure(vars);
        let mut factors: Vec<Potential> = relevant
            .iter()
            .filter_map(|v| self.bn.cpt(*v).cloned())
            .collect();

        let elimination: Vec<VarId> = self
            .bn
            .topological_order()
            .into_iter()
            .rev()
            .filter(|v| relevant.contains(v) && !vars.contains(v))
            .collect();
        trace!(query = ?vars, eliminated = elimination.len(), "exact joint");

        for var in elimination {
            let (with, without): (Vec<Potential>, Vec<Potential>) =
                factors.into_iter().partition(|f| f.contains(var));
            factors = without;
            let mut product = Potential::scalar(1.0);
            for factor in &with {
                product = product.product(factor)?;
            }
            factors.push(product.marginalize(&BTreeSet::from([var])));
        }

        let mut result = Potential::scalar(1.0);
        for factor in &factors {
            result = result.product(factor)?;
        }
        let order: Vec<VarId> = vars.iter().copied().collect();
        result.reorder(&order)
    }
}

impl BayesNet {
    /// Exact inference oracle borrowing this network.
    pub fn inference(&self) -> ExactInference<'_> {
        ExactInference::new(self)
    }
}
