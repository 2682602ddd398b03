//! Public entry points: causal impact of an intervention and counterfactuals.

pub mod causal_impact;
pub mod counterfactual;
pub mod explanation;

pub use causal_impact::{causal_impact, CausalEngine, CausalImpact, CausalQuery};
pub use counterfactual::{counterfactual, TwinNetwork};
pub use explanation::Strategy;
