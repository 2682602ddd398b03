//! # causa-identify
//!
//! Causal identification over latent-confounded Bayesian networks.
//! Builds a causal model from a `BayesNet` and declared latent confounders,
//! searches backdoor and front-door adjustment sets, runs the ID/IDC
//! algorithms, and evaluates the resulting formulas against the
//! observational distribution. Counterfactuals are answered on a twin network.

pub mod adjustment;
pub mod dseparation;
pub mod formula;
pub mod graph;
pub mod identification;
pub mod impact;

pub use adjustment::{BackdoorGenerator, FrontdoorGenerator};
pub use dseparation::{is_d_separated, minimal_cond_set};
pub use formula::{CausalFormula, Formula};
pub use graph::{CausalModel, LatentDescriptor};
pub use identification::{
    do_calculus, do_calculus_with_observation, identifying_intervention, Identifier, Rule,
};
pub use impact::{causal_impact, counterfactual, CausalEngine, CausalImpact, CausalQuery};
