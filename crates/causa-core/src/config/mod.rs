//! Configuration system for causa.
//! TOML-based: project file > compiled defaults, with `CAUSA_*` env overrides.

pub mod causa_config;
pub mod defaults;
pub mod evaluation_config;
pub mod identification_config;

pub use causa_config::CausaConfig;
pub use evaluation_config::EvaluationConfig;
pub use identification_config::IdentificationConfig;
