//! Adjustment-set search: backdoor and front-door generators.

pub mod backdoor;
pub mod combinations;
pub mod frontdoor;

pub use backdoor::BackdoorGenerator;
pub use combinations::{Combinations, SubsetSearch};
pub use frontdoor::FrontdoorGenerator;
