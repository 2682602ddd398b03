//! # causa-core
//!
//! Foundation crate for causa.
//! Defines variable ids, the discrete `Potential` factor, the observational
//! `BayesNet` with its exact inference oracle, and all errors, config and
//! constants shared by the identification layer.

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod model;
pub mod tracing;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CausaConfig;
pub use errors::{CausalError, CausalResult};
pub use inference::ExactInference;
pub use model::{BayesNet, BayesNetSpec, Potential, VarId, Variable};
pub use traits::{InferenceOracle, NameResolver};
