//! Numeric evaluation of a formula against an inference oracle.

use std::collections::BTreeSet;

use causa_core::config::EvaluationConfig;
use causa_core::errors::EvaluationError;
use causa_core::{InferenceOracle, Potential, VarId};
use tracing::trace;

use super::Formula;

impl Formula {
    /// Evaluate with the default [`EvaluationConfig`].
    pub fn evaluate(&self, oracle: &dyn InferenceOracle) -> Result<Potential, EvaluationError> {
        self.evaluate_with(oracle, &EvaluationConfig::default())
    }

    /// Bottom-up evaluation: leaves become oracle factors, operators combine
    /// them pointwise over the union of their scopes.
    pub fn evaluate_with(
        &self,
        oracle: &dyn InferenceOracle,
        config: &EvaluationConfig,
    ) -> Result<Potential, EvaluationError> {
        let _span = causa_core::evaluation_span!(self.size()).entered();
        self.eval(oracle, config)
    }

    fn eval(&self, oracle: &dyn InferenceOracle, config: &EvaluationConfig) -> Result<Potential, EvaluationError> {
        let result = match self {
            Self::JointProba(vars) => oracle.joint(vars)?,
            Self::PosteriorProba(targets, conditions) => {
                // Ratio of joints, so a condition row of probability zero fails
                // like an explicit division does.
                let scope: BTreeSet<VarId> = targets.union(conditions).copied().collect();
                let joint = oracle.joint(&scope)?;
                divide(&joint, &joint.margin(conditions), config.zero_tolerance)?
            }
            Self::Sum(vars, f) => f.eval(oracle, config)?.marginalize(vars),
            Self::Product(factors) => {
                let mut acc = Potential::scalar(1.0);
                for factor in factors {
                    acc = acc.product(&factor.eval(oracle, config)?)?;
                }
                acc
            }
            Self::Plus(terms) => {
                let mut acc = Potential::scalar(0.0);
                for term in terms {
                    acc = acc.combine(&term.eval(oracle, config)?, |l, r| l + r)?;
                }
                acc
            }
            Self::Minus(a, b) => {
                let left = a.eval(oracle, config)?;
                left.combine(&b.eval(oracle, config)?, |l, r| l - r)?
            }
            Self::Division(a, b) => {
                let numerator = a.eval(oracle, config)?;
                let denominator = b.eval(oracle, config)?;
                divide(&numerator, &denominator, config.zero_tolerance)?
            }
        };
        trace!(scope = ?result.vars(), cells = result.len(), "formula node evaluated");
        Ok(result)
    }
}

fn divide(numerator: &Potential, denominator: &Potential, tolerance: f64) -> Result<Potential, EvaluationError> {
    numerator.try_combine(denominator, |n, d, vars, idx| {
        if d.abs() <= tolerance {
            return Err(EvaluationError::DivisionByZero {
                assignment: describe(vars, idx),
            });
        }
        Ok(n / d)
    })
}

fn describe(vars: &[VarId], idx: &[usize]) -> String {
    let cells: Vec<String> = vars.iter().zip(idx).map(|(v, i)| format!("{v}={i}")).collect();
    format!("[{}]", cells.join(","))
}
