use std::collections::BTreeSet;

use causa_core::VarId;
use serde::{Deserialize, Serialize};

/// A declared hidden common cause, as handed over by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatentDescriptor {
    pub name: String,
    pub children: Vec<String>,
}

impl LatentDescriptor {
    pub fn new<S: Into<String>>(name: &str, children: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.to_string(),
            children: children.into_iter().map(Into::into).collect(),
        }
    }
}

/// A latent confounder inside a [`super::CausalModel`]. Always has at least two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Latent {
    pub name: String,
    pub children: BTreeSet<VarId>,
}

impl Latent {
    /// Unordered child pairs, each as `(smaller, larger)`.
    pub fn pairs(&self) -> impl Iterator<Item = (VarId, VarId)> + '_ {
        self.children.iter().enumerate().flat_map(move |(i, a)| {
            self.children.iter().skip(i + 1).map(move |b| (*a, *b))
        })
    }
}
