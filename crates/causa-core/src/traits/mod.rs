pub mod inference_oracle;
pub mod name_resolver;

pub use inference_oracle::InferenceOracle;
pub use name_resolver::NameResolver;
