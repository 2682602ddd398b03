//! Reference inference oracle.

pub mod exact;

pub use exact::ExactInference;
