//! Identification of interventional distributions: do-calculus rules, the
//! ID algorithm and its conditional extension IDC.

pub mod distribution;
pub mod id;
pub mod idc;
pub mod rules;

pub use distribution::Distribution;
pub use id::{do_calculus, identifying_intervention, Identifier};
pub use idc::do_calculus_with_observation;
pub use rules::Rule;
