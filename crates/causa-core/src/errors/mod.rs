//! Error handling for causa.
//! One error enum per subsystem, `thiserror` only.

pub mod causal_error;
pub mod config_error;
pub mod error_code;
pub mod evaluation_error;
pub mod graph_error;
pub mod identification_error;
pub mod model_error;

pub use causal_error::{CausalError, CausalResult};
pub use config_error::ConfigError;
pub use error_code::CausaErrorCode;
pub use evaluation_error::EvaluationError;
pub use graph_error::GraphError;
pub use identification_error::{HedgeException, IdentificationFailure, UnidentifiableException};
pub use model_error::ModelError;
