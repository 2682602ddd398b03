//! Serializable network descriptor, the form fixtures and callers hand over.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::BayesNet;
use crate::errors::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub labels: Vec<String>,
}

/// A Bayesian network as plain data.
///
/// `arcs` are `[parent, child]` name pairs; the parent order of each child is
/// the order its arcs appear in. `cpts` maps a variable name to its table in
/// the layout documented on [`crate::model::Potential`]. Variables without an
/// entry keep a uniform CPT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesNetSpec {
    #[serde(default)]
    pub name: String,
    pub variables: Vec<VariableSpec>,
    #[serde(default)]
    pub arcs: Vec<(String, String)>,
    #[serde(default)]
    pub cpts: BTreeMap<String, Vec<f64>>,
}

impl BayesNetSpec {
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        serde_json::from_str(text).map_err(|e| ModelError::InvalidDescriptor {
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::InvalidDescriptor {
            reason: e.to_string(),
        })
    }

    pub fn build(&self) -> Result<BayesNet, ModelError> {
        let mut bn = BayesNet::new(&self.name);
        for var in &self.variables {
            let labels: Vec<&str> = var.labels.iter().map(String::as_str).collect();
            bn.add_variable(&var.name, &labels)?;
        }
        for (parent, child) in &self.arcs {
            let p = bn.require(parent)?;
            let c = bn.require(child)?;
            bn.add_arc(p, c)?;
        }
        for (name, values) in &self.cpts {
            let id = bn.require(name)?;
            bn.set_cpt(id, values.clone())?;
        }
        Ok(bn)
    }
}

impl TryFrom<&BayesNetSpec> for BayesNet {
    type Error = ModelError;

    fn try_from(spec: &BayesNetSpec) -> Result<Self, Self::Error> {
        spec.build()
    }
}
