use std::collections::BTreeSet;

use causa_core::config::EvaluationConfig;
use causa_core::errors::EvaluationError;
use causa_core::{InferenceOracle, NameResolver, Potential, VarId};

use super::latex::latex_list;
use super::render::name_list;
use super::Formula;

/// A formula together with the query it answers: `P(on | do(doing), knowing)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalFormula {
    pub root: Formula,
    pub on: BTreeSet<VarId>,
    pub doing: BTreeSet<VarId>,
    pub knowing: BTreeSet<VarId>,
}

impl CausalFormula {
    pub fn new(root: Formula, on: BTreeSet<VarId>, doing: BTreeSet<VarId>, knowing: BTreeSet<VarId>) -> Self {
        Self {
            root,
            on,
            doing,
            knowing,
        }
    }

    /// Left-hand side in plain text, e.g. `P(C|do(S),A)`.
    pub fn query(&self, names: &dyn NameResolver) -> String {
        let mut given = Vec::new();
        if !self.doing.is_empty() {
            given.push(format!("do({})", name_list(names, &self.doing)));
        }
        if !self.knowing.is_empty() {
            given.push(name_list(names, &self.knowing));
        }
        if given.is_empty() {
            format!("P({})", name_list(names, &self.on))
        } else {
            format!("P({}|{})", name_list(names, &self.on), given.join(","))
        }
    }

    /// The query line followed by the indented tree.
    pub fn render(&self, names: &dyn NameResolver) -> String {
        format!("{} =\n{}", self.query(names), self.root.render(names))
    }

    pub fn to_latex(&self, names: &dyn NameResolver) -> String {
        let mut given = Vec::new();
        if !self.doing.is_empty() {
            given.push(format!("\\hookrightarrow {}", latex_list(names, &self.doing)));
        }
        if !self.knowing.is_empty() {
            given.push(latex_list(names, &self.knowing));
        }
        let lhs = if given.is_empty() {
            format!("P\\left({}\\right)", latex_list(names, &self.on))
        } else {
            format!("P\\left({}\\mid {}\\right)", latex_list(names, &self.on), given.join(", "))
        };
        format!("{lhs} = {}", self.root.to_latex(names))
    }

    pub fn evaluate(&self, oracle: &dyn InferenceOracle) -> Result<Potential, EvaluationError> {
        self.root.evaluate(oracle)
    }

    pub fn evaluate_with(
        &self,
        oracle: &dyn InferenceOracle,
        config: &EvaluationConfig,
    ) -> Result<Potential, EvaluationError> {
        self.root.evaluate_with(oracle, config)
    }
}
