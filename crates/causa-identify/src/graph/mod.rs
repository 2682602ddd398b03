//! Causal graph: a DAG over observable ids plus latent confounders.

pub mod causal_model;
pub mod dag_enforcement;
pub mod districts;
pub mod latent;
pub mod traversal;

pub use causal_model::CausalModel;
pub use latent::{Latent, LatentDescriptor};

/// The plain directed graph every algorithm of this crate walks.
pub type Dag = petgraph::graphmap::DiGraphMap<causa_core::VarId, ()>;
