//! Observational model: variables, discrete factors and the Bayesian network.

pub mod bayes_net;
pub mod potential;
pub mod spec;
pub mod variable;

pub use bayes_net::BayesNet;
pub use potential::{Assignments, Potential};
pub use spec::{BayesNetSpec, VariableSpec};
pub use variable::{VarId, Variable};
