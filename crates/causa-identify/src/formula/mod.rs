//! Symbolic probability formulas: construction, rendering, LaTeX and evaluation.

pub mod ast;
pub mod causal_formula;
pub mod eval;
pub mod latex;
pub mod render;

pub use ast::Formula;
pub use causal_formula::CausalFormula;
