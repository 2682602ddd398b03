//! Conditional independence on the causal graph.

pub mod d_separation;
pub mod minimal_cond_set;

pub use d_separation::{ancestral_set, is_d_separated, moralize, MoralGraph};
pub use minimal_cond_set::minimal_cond_set;
