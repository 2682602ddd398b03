use serde::{Deserialize, Serialize};

use super::defaults;

/// Formula evaluation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Denominator cells with absolute value at or below this are zero.
    pub zero_tolerance: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            zero_tolerance: defaults::DEFAULT_ZERO_TOLERANCE,
        }
    }
}
